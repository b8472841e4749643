//! Confirmation-gated user reset (spec §9.3, Open Question (c)): wipes
//! progress, plan, and sessions; resets settings and reminder config to
//! defaults rather than deleting the reminder row outright, so a
//! snoozed/disabled reminder doesn't silently reappear mid-edit. Runs
//! as a single transaction (spec §5) via [`Transactor`].

use crate::domain::Result;
use crate::ports::Transactor;
use std::sync::Arc;

pub struct ResetService {
    transactor: Arc<dyn Transactor>,
}

impl ResetService {
    pub fn new(transactor: Arc<dyn Transactor>) -> Self {
        Self { transactor }
    }

    pub async fn reset(&self, user_id: &str) -> Result<()> {
        self.transactor.reset_user(user_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockTransactor;

    #[tokio::test]
    async fn reset_delegates_to_the_transactor() {
        let mut transactor = MockTransactor::new();
        transactor
            .expect_reset_user()
            .withf(|user_id| user_id == "u1")
            .times(1)
            .returning(|_| Ok(()));

        let service = ResetService::new(Arc::new(transactor));
        service.reset("u1").await.unwrap();
    }
}
