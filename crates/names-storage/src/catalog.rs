//! JSON-backed, in-memory implementation of [`names_core::ports::Catalog`]
//! (spec §6 catalog input format).

use names_core::domain::{Item, CATALOG_SIZE};
use names_core::ports::Catalog;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::error::StorageError;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    names: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    number: u8,
    name: String,
    transliteration: String,
    translation: String,
    meaning: String,
    audio: Option<String>,
}

/// Loaded once at startup and held immutably for the lifetime of the process.
#[derive(Debug)]
pub struct JsonCatalog {
    items: Vec<Item>,
    by_number: HashMap<u8, usize>,
}

impl JsonCatalog {
    /// Parses `raw` and validates that it contains exactly
    /// [`CATALOG_SIZE`] entries numbered `1..=99` with no duplicates.
    pub fn from_json(raw: &str) -> Result<Self, StorageError> {
        let file: CatalogFile =
            serde_json::from_str(raw).map_err(|e| StorageError::Catalog(e.to_string()))?;

        if file.names.len() != CATALOG_SIZE {
            return Err(StorageError::Catalog(format!(
                "expected {CATALOG_SIZE} catalog entries, found {}",
                file.names.len()
            )));
        }

        let mut by_number = HashMap::with_capacity(CATALOG_SIZE);
        let mut items = Vec::with_capacity(CATALOG_SIZE);
        for (idx, entry) in file.names.into_iter().enumerate() {
            if !(1..=CATALOG_SIZE as u16).contains(&(entry.number as u16)) {
                return Err(StorageError::Catalog(format!(
                    "catalog entry number out of range: {}",
                    entry.number
                )));
            }
            if by_number.insert(entry.number, idx).is_some() {
                return Err(StorageError::Catalog(format!(
                    "duplicate catalog entry number: {}",
                    entry.number
                )));
            }
            items.push(Item {
                number: entry.number,
                arabic: entry.name,
                transliteration: entry.transliteration,
                translation: entry.translation,
                meaning: entry.meaning,
                audio_ref: entry.audio,
            });
        }

        let expected: std::collections::BTreeSet<u8> = (1..=CATALOG_SIZE as u8).collect();
        let got: std::collections::BTreeSet<u8> = by_number.keys().copied().collect();
        if expected != got {
            return Err(StorageError::Catalog(
                "catalog numbers must be exactly {1..=99}".to_string(),
            ));
        }

        Ok(Self { items, by_number })
    }

    pub async fn load_from_path(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StorageError::Catalog(e.to_string()))?;
        Self::from_json(&raw)
    }
}

impl Catalog for JsonCatalog {
    fn by_number(&self, number: u8) -> Option<Item> {
        self.by_number.get(&number).map(|&idx| self.items[idx].clone())
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

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json(count: usize) -> String {
        let entries: Vec<String> = (1..=count)
            .map(|n| {
                format!(
                    r#"{{"number":{n},"name":"arabic-{n}","transliteration":"translit-{n}","translation":"translation-{n}","meaning":"meaning-{n}","audio":null}}"#
                )
            })
            .collect();
        format!(r#"{{"names":[{}]}}"#, entries.join(","))
    }

    #[test]
    fn loads_exactly_99_entries() {
        let catalog = JsonCatalog::from_json(&sample_json(99)).unwrap();
        assert_eq!(catalog.all().len(), 99);
        assert!(catalog.by_number(1).is_some());
        assert!(catalog.by_number(99).is_some());
        assert!(catalog.by_number(100).is_none());
    }

    #[test]
    fn rejects_wrong_count() {
        let err = JsonCatalog::from_json(&sample_json(98)).unwrap_err();
        assert!(matches!(err, StorageError::Catalog(_)));
    }

    #[test]
    fn rejects_duplicate_numbers() {
        let raw = r#"{"names":[
            {"number":1,"name":"a","transliteration":"t","translation":"x","meaning":"m","audio":null},
            {"number":1,"name":"b","transliteration":"t","translation":"y","meaning":"m","audio":null}
        ]}"#;
        let err = JsonCatalog::from_json(raw).unwrap_err();
        assert!(matches!(err, StorageError::Catalog(_)));
    }
}
