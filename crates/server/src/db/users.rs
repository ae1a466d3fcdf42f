//! User repository: operations on the `users` collection.
//!
//! Every method is atomic with respect to the user document it touches; the
//! bounded flowchart push and the garage reference operations in particular
//! are single store-side operations, not read-modify-write sequences.

use chrono::Utc;

use carit_core::{UserId, VehicleId};

use super::{Database, RepositoryError};
use crate::models::{Flowchart, UserDataPatch, UserDocument};

/// Repository for user document operations.
pub struct UserRepository<'a> {
    db: &'a Database,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Get a user document by id.
    pub async fn get(&self, id: &UserId) -> Option<UserDocument> {
        self.db.users().read().await.get(id.as_str()).cloned()
    }

    /// Insert a document unless one already exists under the same id.
    ///
    /// Returns whether the insert happened. A `false` return means another
    /// document holds the id; callers treat that as "already exists" and
    /// fall through to the backfill path.
    pub async fn insert_if_absent(&self, doc: UserDocument) -> bool {
        let mut users = self.db.users().write().await;
        if users.contains_key(doc.id.as_str()) {
            return false;
        }
        users.insert(doc.id.as_str().to_owned(), doc);
        true
    }

    /// Replace the stored document wholesale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no document exists for the id.
    pub async fn replace(&self, mut doc: UserDocument) -> Result<(), RepositoryError> {
        let mut users = self.db.users().write().await;
        if !users.contains_key(doc.id.as_str()) {
            return Err(RepositoryError::NotFound);
        }
        doc.updated_at = Utc::now();
        users.insert(doc.id.as_str().to_owned(), doc);
        Ok(())
    }

    /// Merge the supplied profile fields into the document, last-write-wins
    /// per field.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn merge_user_data(
        &self,
        id: &UserId,
        patch: &UserDataPatch,
    ) -> Result<(), RepositoryError> {
        let mut users = self.db.users().write().await;
        let doc = users.get_mut(id.as_str()).ok_or(RepositoryError::NotFound)?;
        if let Some(name) = &patch.name {
            doc.name = name.clone();
        }
        if let Some(email) = &patch.email {
            doc.email = email.clone();
        }
        if let Some(level) = patch.experience_level {
            doc.experience_level = Some(level);
        }
        doc.updated_at = Utc::now();
        Ok(())
    }

    /// Append a flowchart, evicting the oldest entry first when the history
    /// is at `cap`. Trim-then-push happens under the write lock, so
    /// concurrent appends cannot lose an update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn push_flowchart(
        &self,
        id: &UserId,
        flowchart: Flowchart,
        cap: usize,
    ) -> Result<(), RepositoryError> {
        let mut users = self.db.users().write().await;
        let doc = users.get_mut(id.as_str()).ok_or(RepositoryError::NotFound)?;
        while doc.flowcharts.len() >= cap {
            doc.flowcharts.remove(0);
        }
        doc.flowcharts.push(flowchart);
        doc.updated_at = Utc::now();
        Ok(())
    }

    /// Overwrite the stored flowchart sequence.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn set_flowcharts(
        &self,
        id: &UserId,
        flowcharts: Vec<Flowchart>,
    ) -> Result<(), RepositoryError> {
        let mut users = self.db.users().write().await;
        let doc = users.get_mut(id.as_str()).ok_or(RepositoryError::NotFound)?;
        doc.flowcharts = flowcharts;
        doc.updated_at = Utc::now();
        Ok(())
    }

    /// Append a garage reference unless an entry with the same string form
    /// is already present.
    ///
    /// Returns whether the reference was added.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn add_garage_ref(
        &self,
        id: &UserId,
        vehicle: &VehicleId,
    ) -> Result<bool, RepositoryError> {
        let mut users = self.db.users().write().await;
        let doc = users.get_mut(id.as_str()).ok_or(RepositoryError::NotFound)?;
        if doc.owns_vehicle(vehicle) {
            return Ok(false);
        }
        doc.garage.push(vehicle.clone());
        doc.updated_at = Utc::now();
        Ok(true)
    }

    /// Remove every garage reference matching the id's string form.
    ///
    /// Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn remove_garage_ref(
        &self,
        id: &UserId,
        vehicle: &VehicleId,
    ) -> Result<bool, RepositoryError> {
        let mut users = self.db.users().write().await;
        let doc = users.get_mut(id.as_str()).ok_or(RepositoryError::NotFound)?;
        let before = doc.garage.len();
        doc.garage.retain(|v| v.as_str() != vehicle.as_str());
        let removed = doc.garage.len() != before;
        if removed {
            doc.updated_at = Utc::now();
        }
        Ok(removed)
    }

    /// Repoint a garage reference from `old` to `new` in place, deduplicating
    /// if the user already holds `new`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn replace_garage_ref(
        &self,
        id: &UserId,
        old: &VehicleId,
        new: &VehicleId,
    ) -> Result<(), RepositoryError> {
        let mut users = self.db.users().write().await;
        let doc = users.get_mut(id.as_str()).ok_or(RepositoryError::NotFound)?;
        doc.garage.retain(|v| v.as_str() != old.as_str());
        if !doc.owns_vehicle(new) {
            doc.garage.push(new.clone());
        }
        doc.updated_at = Utc::now();
        Ok(())
    }

    /// Count the garage references to a vehicle across every user.
    ///
    /// This is the reference count that decides when a catalog entry may be
    /// deleted.
    pub async fn count_garage_refs(&self, vehicle: &VehicleId) -> usize {
        let users = self.db.users().read().await;
        users.values().filter(|doc| doc.owns_vehicle(vehicle)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use carit_core::VehicleKey;
    use crate::models::QuestionAnswer;

    fn flowchart(issue: &str) -> Flowchart {
        Flowchart {
            flowchart: format!("graph for {issue}"),
            vehicle: VehicleKey::new(2021, "Honda", "Civic", None),
            issues: issue.to_owned(),
            responses: vec![QuestionAnswer {
                question: "When did it start?".to_owned(),
                answer: "Yesterday".to_owned(),
            }],
        }
    }

    fn user(id: &str) -> UserDocument {
        UserDocument::new(UserId::from(id), "Test".into(), "t@example.com".into(), Some(1))
    }

    #[tokio::test]
    async fn insert_if_absent_reports_existing_documents() {
        let db = Database::new();
        let repo = UserRepository::new(&db);
        assert!(repo.insert_if_absent(user("u1")).await);
        assert!(!repo.insert_if_absent(user("u1")).await);
    }

    #[tokio::test]
    async fn push_flowchart_evicts_oldest_at_cap() {
        let db = Database::new();
        let repo = UserRepository::new(&db);
        repo.insert_if_absent(user("u1")).await;
        let id = UserId::from("u1");

        for issue in ["A", "B", "C", "D", "E"] {
            repo.push_flowchart(&id, flowchart(issue), 5).await.unwrap();
        }
        repo.push_flowchart(&id, flowchart("F"), 5).await.unwrap();

        let stored = repo.get(&id).await.unwrap().flowcharts;
        assert_eq!(stored.len(), 5);
        assert_eq!(stored.first().unwrap().issues, "B");
        assert_eq!(stored.last().unwrap().issues, "F");
    }

    #[tokio::test]
    async fn concurrent_pushes_both_land() {
        let db = Database::new();
        let repo = UserRepository::new(&db);
        repo.insert_if_absent(user("u1")).await;
        let id = UserId::from("u1");

        for issue in ["A", "B", "C", "D"] {
            repo.push_flowchart(&id, flowchart(issue), 5).await.unwrap();
        }

        // Two simultaneous appends at one below the cap: trim-then-push runs
        // under the write lock, so both must land and neither update is lost.
        let db_a = db.clone();
        let db_b = db.clone();
        let id_a = id.clone();
        let id_b = id.clone();
        let (a, b) = tokio::join!(
            tokio::spawn(async move {
                UserRepository::new(&db_a)
                    .push_flowchart(&id_a, flowchart("E"), 5)
                    .await
            }),
            tokio::spawn(async move {
                UserRepository::new(&db_b)
                    .push_flowchart(&id_b, flowchart("F"), 5)
                    .await
            }),
        );
        a.unwrap().unwrap();
        b.unwrap().unwrap();

        let stored = repo.get(&id).await.unwrap().flowcharts;
        assert_eq!(stored.len(), 5);
        let issues: Vec<&str> = stored.iter().map(|f| f.issues.as_str()).collect();
        assert!(issues.contains(&"E") && issues.contains(&"F"));
    }

    #[tokio::test]
    async fn garage_refs_deduplicate_by_string_form() {
        let db = Database::new();
        let repo = UserRepository::new(&db);
        repo.insert_if_absent(user("u1")).await;
        let id = UserId::from("u1");
        let vehicle = VehicleId::from("v-1");

        assert!(repo.add_garage_ref(&id, &vehicle).await.unwrap());
        assert!(!repo.add_garage_ref(&id, &vehicle).await.unwrap());
        assert_eq!(repo.get(&id).await.unwrap().garage.len(), 1);

        assert!(repo.remove_garage_ref(&id, &vehicle).await.unwrap());
        assert!(!repo.remove_garage_ref(&id, &vehicle).await.unwrap());
    }

    #[tokio::test]
    async fn count_garage_refs_spans_users() {
        let db = Database::new();
        let repo = UserRepository::new(&db);
        repo.insert_if_absent(user("u1")).await;
        repo.insert_if_absent(user("u2")).await;
        let vehicle = VehicleId::from("v-1");

        repo.add_garage_ref(&UserId::from("u1"), &vehicle).await.unwrap();
        repo.add_garage_ref(&UserId::from("u2"), &vehicle).await.unwrap();
        assert_eq!(repo.count_garage_refs(&vehicle).await, 2);

        repo.remove_garage_ref(&UserId::from("u1"), &vehicle).await.unwrap();
        assert_eq!(repo.count_garage_refs(&vehicle).await, 1);
    }

    #[tokio::test]
    async fn operations_on_missing_users_report_not_found() {
        let db = Database::new();
        let repo = UserRepository::new(&db);
        let id = UserId::from("ghost");

        assert!(matches!(
            repo.push_flowchart(&id, flowchart("A"), 5).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            repo.add_garage_ref(&id, &VehicleId::from("v-1")).await,
            Err(RepositoryError::NotFound)
        ));
    }
}
