//! Reusable test data: a synthetic 99-item catalog and an in-memory
//! [`Catalog`] implementation for unit tests that don't need a mock's
//! per-call expectations.

use crate::domain::{Item, CATALOG_SIZE};
use crate::ports::Catalog;
use rand::seq::SliceRandom;

/// A deterministic 99-item catalog with distinct text per field.
pub fn synthetic_catalog() -> Vec<Item> {
    (1..=CATALOG_SIZE as u8)
        .map(|number| Item {
            number,
            arabic: format!("arabic-{number}"),
            transliteration: format!("translit-{number}"),
            translation: format!("translation-{number}"),
            meaning: format!("meaning-{number}"),
            audio_ref: None,
        })
        .collect()
}

/// An in-memory [`Catalog`] backed by [`synthetic_catalog`].
pub struct InMemoryCatalog {
    items: Vec<Item>,
}

impl InMemoryCatalog {
    pub fn synthetic() -> Self {
        Self {
            items: synthetic_catalog(),
        }
    }

    pub fn from_items(items: Vec<Item>) -> Self {
        Self { items }
    }
}

impl Catalog for InMemoryCatalog {
    fn by_number(&self, number: u8) -> Option<Item> {
        self.items.iter().find(|i| i.number == number).cloned()
    }

    fn by_numbers(&self, numbers: &[u8]) -> Vec<Item> {
        numbers.iter().filter_map(|n| self.by_number(*n)).collect()
    }

    fn random(&self) -> Option<Item> {
        self.items.choose(&mut rand::thread_rng()).cloned()
    }

    fn all(&self) -> Vec<Item> {
        self.items.clone()
    }
}
