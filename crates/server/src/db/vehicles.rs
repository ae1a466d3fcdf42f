//! Vehicle catalog repository: operations on the `vehicles` collection.
//!
//! The catalog stores each distinct `(year, make, model, trim)` tuple exactly
//! once. Deduplication rides on the collection's unique tuple index:
//! `find_or_create` holds the write lock across lookup and insert, so two
//! concurrent calls for the same new tuple resolve to one entry.

use std::collections::BTreeSet;

use carit_core::{VehicleId, VehicleKey};

use super::Database;
use crate::models::CatalogEntry;

/// Filter over catalog entries; absent fields match everything.
#[derive(Debug, Clone, Default)]
pub struct VehicleFilter {
    pub year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
}

impl VehicleFilter {
    fn matches(&self, entry: &CatalogEntry) -> bool {
        self.year.is_none_or(|y| entry.year == y)
            && self.make.as_deref().is_none_or(|m| entry.make == m)
            && self.model.as_deref().is_none_or(|m| entry.model == m)
    }
}

/// The string-valued catalog fields a distinct query can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringField {
    Make,
    Model,
    Trim,
}

/// Repository for catalog entry operations.
pub struct VehicleRepository<'a> {
    db: &'a Database,
}

impl<'a> VehicleRepository<'a> {
    /// Create a new vehicle repository.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Look up the entry for a tuple, inserting one under a fresh identifier
    /// if none exists. Idempotent: the same tuple always resolves to the
    /// same identifier.
    pub async fn find_or_create(&self, key: VehicleKey) -> CatalogEntry {
        let mut vehicles = self.db.vehicles().write().await;

        if let Some(id) = vehicles.by_key.get(&key)
            && let Some(entry) = vehicles.entries.get(id.as_str())
        {
            return entry.clone();
        }

        let entry = CatalogEntry::from_key(VehicleId::generate(), key);
        vehicles.by_key.insert(entry.key(), entry.id.clone());
        vehicles
            .entries
            .insert(entry.id.as_str().to_owned(), entry.clone());
        entry
    }

    /// Get an entry by id.
    pub async fn get(&self, id: &VehicleId) -> Option<CatalogEntry> {
        self.db.vehicles().read().await.entries.get(id.as_str()).cloned()
    }

    /// Hydrate a sequence of ids, preserving order and skipping dangling
    /// references.
    pub async fn get_many(&self, ids: &[VehicleId]) -> Vec<CatalogEntry> {
        let vehicles = self.db.vehicles().read().await;
        ids.iter()
            .filter_map(|id| vehicles.entries.get(id.as_str()).cloned())
            .collect()
    }

    /// Delete an entry and its index slot.
    ///
    /// Returns whether an entry existed.
    pub async fn delete(&self, id: &VehicleId) -> bool {
        let mut vehicles = self.db.vehicles().write().await;
        match vehicles.entries.remove(id.as_str()) {
            Some(entry) => {
                vehicles.by_key.remove(&entry.key());
                true
            }
            None => false,
        }
    }

    /// Distinct years among entries matching the filter, newest first.
    pub async fn distinct_years(&self, filter: &VehicleFilter) -> Vec<i32> {
        let vehicles = self.db.vehicles().read().await;
        let years: BTreeSet<i32> = vehicles
            .entries
            .values()
            .filter(|entry| filter.matches(entry) && entry.year != 0)
            .map(|entry| entry.year)
            .collect();
        years.into_iter().rev().collect()
    }

    /// Distinct non-empty values of a string field among entries matching
    /// the filter, ascending.
    pub async fn distinct_strings(&self, field: StringField, filter: &VehicleFilter) -> Vec<String> {
        let vehicles = self.db.vehicles().read().await;
        let values: BTreeSet<String> = vehicles
            .entries
            .values()
            .filter(|entry| filter.matches(entry))
            .map(|entry| match field {
                StringField::Make => entry.make.clone(),
                StringField::Model => entry.model.clone(),
                StringField::Trim => entry.trim.clone(),
            })
            .filter(|value| !value.is_empty())
            .collect();
        values.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(year: i32, make: &str, model: &str, trim: &str) -> VehicleKey {
        VehicleKey::new(year, make, model, Some(trim.to_owned()))
    }

    #[tokio::test]
    async fn find_or_create_is_idempotent_per_tuple() {
        let db = Database::new();
        let repo = VehicleRepository::new(&db);

        let first = repo.find_or_create(key(2021, "Honda", "Civic", "EX")).await;
        let second = repo.find_or_create(key(2021, "Honda", "Civic", "EX")).await;
        assert_eq!(first.id, second.id);

        let other = repo.find_or_create(key(2021, "Honda", "Civic", "")).await;
        assert_ne!(first.id, other.id);
    }

    #[tokio::test]
    async fn concurrent_identical_inserts_yield_one_entry() {
        let db = Database::new();

        // Lookup and insert happen under one write lock, so two simultaneous
        // calls for the same new tuple must resolve to a single entry.
        let db_a = db.clone();
        let db_b = db.clone();
        let (a, b) = tokio::join!(
            tokio::spawn(async move {
                VehicleRepository::new(&db_a)
                    .find_or_create(key(2021, "Honda", "Civic", "EX"))
                    .await
            }),
            tokio::spawn(async move {
                VehicleRepository::new(&db_b)
                    .find_or_create(key(2021, "Honda", "Civic", "EX"))
                    .await
            }),
        );
        assert_eq!(a.unwrap().id, b.unwrap().id);
        assert_eq!(db.vehicles().read().await.entries.len(), 1);
    }

    #[tokio::test]
    async fn delete_frees_the_tuple_for_a_new_identifier() {
        let db = Database::new();
        let repo = VehicleRepository::new(&db);

        let entry = repo.find_or_create(key(2020, "Toyota", "Camry", "LE")).await;
        assert!(repo.delete(&entry.id).await);
        assert!(!repo.delete(&entry.id).await);

        let recreated = repo.find_or_create(key(2020, "Toyota", "Camry", "LE")).await;
        assert_ne!(recreated.id, entry.id);
    }

    #[tokio::test]
    async fn distinct_years_sort_descending() {
        let db = Database::new();
        let repo = VehicleRepository::new(&db);
        for year in [2019, 2021, 2020] {
            repo.find_or_create(key(year, "Honda", "Civic", "")).await;
        }

        let years = repo.distinct_years(&VehicleFilter::default()).await;
        assert_eq!(years, vec![2021, 2020, 2019]);
    }

    #[tokio::test]
    async fn distinct_strings_sort_ascending_and_drop_empties() {
        let db = Database::new();
        let repo = VehicleRepository::new(&db);
        repo.find_or_create(key(2021, "Toyota", "Camry", "SE")).await;
        repo.find_or_create(key(2021, "Honda", "Civic", "")).await;
        repo.find_or_create(key(2021, "Honda", "Accord", "LX")).await;

        let makes = repo
            .distinct_strings(StringField::Make, &VehicleFilter::default())
            .await;
        assert_eq!(makes, vec!["Honda".to_owned(), "Toyota".to_owned()]);

        // The empty Civic trim is a real catalog value but never a dropdown
        // choice.
        let trims = repo
            .distinct_strings(StringField::Trim, &VehicleFilter::default())
            .await;
        assert_eq!(trims, vec!["LX".to_owned(), "SE".to_owned()]);
    }

    #[tokio::test]
    async fn filters_constrain_distinct_queries() {
        let db = Database::new();
        let repo = VehicleRepository::new(&db);
        repo.find_or_create(key(2020, "Honda", "Civic", "EX")).await;
        repo.find_or_create(key(2021, "Honda", "Accord", "LX")).await;
        repo.find_or_create(key(2021, "Toyota", "Camry", "SE")).await;

        let filter = VehicleFilter {
            year: Some(2021),
            make: Some("Honda".to_owned()),
            model: None,
        };
        let models = repo.distinct_strings(StringField::Model, &filter).await;
        assert_eq!(models, vec!["Accord".to_owned()]);
    }
}
