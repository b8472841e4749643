use crate::domain::Item;

/// The 99-item catalog, loaded once at startup and treated as immutable
/// thereafter (spec §4.8). Implementations must reject a source that
/// doesn't contain exactly [`CATALOG_SIZE`](crate::domain::CATALOG_SIZE)
/// entries before ever exposing one through this trait.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait Catalog: Send + Sync {
    fn by_number(&self, number: u8) -> Option<Item>;
    fn by_numbers(&self, numbers: &[u8]) -> Vec<Item>;
    fn random(&self) -> Option<Item>;
    fn all(&self) -> Vec<Item>;
}
