//! Test utilities shared across `names-core` and downstream crates'
//! integration tests. Gated behind `feature = "testing"` so
//! `names-storage` and `names-service` can depend on the mocks without
//! pulling them into a normal build.

pub mod fixtures;

pub use crate::ports::{
    MockCatalog, MockNotifier, MockPlanStore, MockProgressStore, MockQuizStore,
    MockReminderStore, MockSettingsStore, MockUserRegistry,
};
