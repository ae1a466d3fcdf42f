//! User profile service.
//!
//! Owns the user document lifecycle: the idempotent create-or-backfill run
//! on first authenticated contact, the profile projection, and partial
//! profile updates. Garage and flowchart operations go through the same
//! document but live in their own services.

use carit_core::UserId;

use crate::db::{Database, RepositoryError, UserRepository};
use crate::error::{AppError, Result};
use crate::models::{UserData, UserDataPatch, UserDocument};

use super::MISSING_FIELDS;

/// What `create_or_backfill` did to the stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// No document existed; one was created with defaults.
    Created,
    /// A document existed with unset fields; they were backfilled.
    Updated,
    /// A document existed and every default field was already filled.
    AlreadyExists,
}

impl CreateOutcome {
    /// The human-readable outcome reported to the client.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Created => "User created",
            Self::Updated => "User updated",
            Self::AlreadyExists => "User already exists",
        }
    }
}

/// The canonical ordered default-field table driving the backfill.
///
/// One entry per field of the creation-time document; `apply` fills any
/// unset field and reports whether the document actually changed, which is
/// what keeps repeated calls idempotent (filling an empty field with an
/// empty default is not a change).
struct UserDefaults {
    name: String,
    email: String,
    attitude: String,
    experience_level: Option<i32>,
}

impl UserDefaults {
    fn apply(&self, doc: &mut UserDocument) -> bool {
        let mut updated = false;
        fill_if_blank(&mut doc.name, &self.name, &mut updated);
        fill_if_blank(&mut doc.email, &self.email, &mut updated);
        fill_if_blank(&mut doc.attitude, &self.attitude, &mut updated);
        // crashOut is an integer with a serde default; nothing to backfill.
        if doc.experience_level.is_none() && self.experience_level.is_some() {
            doc.experience_level = self.experience_level;
            updated = true;
        }
        updated
    }
}

fn fill_if_blank(field: &mut String, default: &str, updated: &mut bool) {
    if field.trim().is_empty() && field != default {
        *field = default.to_owned();
        *updated = true;
    }
}

/// User profile service.
pub struct UserService<'a> {
    users: UserRepository<'a>,
    default_experience_level: Option<i32>,
}

impl<'a> UserService<'a> {
    /// Create a new user service.
    ///
    /// `default_experience_level` is the deployment policy for newly created
    /// users (None leaves the level unset).
    #[must_use]
    pub const fn new(db: &'a Database, default_experience_level: Option<i32>) -> Self {
        Self {
            users: UserRepository::new(db),
            default_experience_level,
        }
    }

    /// Get the full user document.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a blank id and `NotFound` if no
    /// document exists.
    pub async fn get(&self, user_id: &UserId) -> Result<UserDocument> {
        if user_id.is_blank() {
            return Err(AppError::InvalidArgument(MISSING_FIELDS.to_owned()));
        }
        self.users
            .get(user_id)
            .await
            .ok_or_else(|| AppError::NotFound("User not found".to_owned()))
    }

    /// Create the user document on first contact, or backfill unset fields
    /// on later contacts.
    ///
    /// Idempotent: repeated calls with the same inputs converge to the same
    /// stored state and stop reporting `Updated` once every field is filled.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if any of id/name/email is blank.
    pub async fn create_or_backfill(
        &self,
        user_id: &UserId,
        name: &str,
        email: &str,
    ) -> Result<CreateOutcome> {
        if user_id.is_blank() || name.trim().is_empty() || email.trim().is_empty() {
            return Err(AppError::InvalidArgument(MISSING_FIELDS.to_owned()));
        }

        let fresh = UserDocument::new(
            user_id.clone(),
            name.to_owned(),
            email.to_owned(),
            self.default_experience_level,
        );
        if self.users.insert_if_absent(fresh).await {
            tracing::info!(user = %user_id, "user created");
            return Ok(CreateOutcome::Created);
        }

        // Lost the create race or the user already existed; either way the
        // document is there now and may have holes to fill.
        let Some(mut doc) = self.users.get(user_id).await else {
            return Err(AppError::NotFound("User not found".to_owned()));
        };

        let defaults = UserDefaults {
            name: name.to_owned(),
            email: email.to_owned(),
            attitude: String::new(),
            experience_level: self.default_experience_level,
        };

        if defaults.apply(&mut doc) {
            self.users.replace(doc).await.map_err(not_found)?;
            tracing::info!(user = %user_id, "user backfilled");
            Ok(CreateOutcome::Updated)
        } else {
            Ok(CreateOutcome::AlreadyExists)
        }
    }

    /// The `{name, email, experienceLevel}` projection.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a blank id and `NotFound` if no
    /// document exists.
    pub async fn get_user_data(&self, user_id: &UserId) -> Result<UserData> {
        Ok(UserData::from(&self.get(user_id).await?))
    }

    /// Merge a partial profile update, last-write-wins per field.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a blank id or an empty patch, and
    /// `NotFound` if the user does not exist (chosen over a silent no-op).
    pub async fn set_user_data(&self, user_id: &UserId, patch: &UserDataPatch) -> Result<()> {
        if user_id.is_blank() || patch.is_empty() {
            return Err(AppError::InvalidArgument(MISSING_FIELDS.to_owned()));
        }
        self.users
            .merge_user_data(user_id, patch)
            .await
            .map_err(not_found)
    }
}

fn not_found(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound("User not found".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(db: &Database) -> UserService<'_> {
        UserService::new(db, Some(1))
    }

    #[tokio::test]
    async fn create_then_backfill_then_converge() {
        let db = Database::new();
        let svc = service(&db);
        let id = UserId::from("auth0|42");

        let outcome = svc
            .create_or_backfill(&id, "Ada", "ada@example.com")
            .await
            .unwrap();
        assert_eq!(outcome, CreateOutcome::Created);

        let doc = svc.get(&id).await.unwrap();
        assert_eq!(doc.name, "Ada");
        assert_eq!(doc.experience_level, Some(1));
        assert_eq!(doc.crash_out, 0);
        assert!(doc.flowcharts.is_empty());
        assert!(doc.garage.is_empty());

        // Same inputs again: nothing left to fill.
        let outcome = svc
            .create_or_backfill(&id, "Ada", "ada@example.com")
            .await
            .unwrap();
        assert_eq!(outcome, CreateOutcome::AlreadyExists);
    }

    #[tokio::test]
    async fn backfill_fills_only_unset_fields() {
        let db = Database::new();
        let svc = service(&db);
        let id = UserId::from("u1");

        // A historical document with a blank email and no experience level.
        let mut doc = UserDocument::new(id.clone(), "Grace".into(), String::new(), None);
        doc.attitude = "direct".to_owned();
        UserRepository::new(&db).insert_if_absent(doc).await;

        let outcome = svc
            .create_or_backfill(&id, "Other Name", "grace@example.com")
            .await
            .unwrap();
        assert_eq!(outcome, CreateOutcome::Updated);

        let stored = svc.get(&id).await.unwrap();
        assert_eq!(stored.name, "Grace", "filled fields are not overwritten");
        assert_eq!(stored.email, "grace@example.com");
        assert_eq!(stored.attitude, "direct");
        assert_eq!(stored.experience_level, Some(1));

        // Idempotent from here on.
        let outcome = svc
            .create_or_backfill(&id, "Other Name", "grace@example.com")
            .await
            .unwrap();
        assert_eq!(outcome, CreateOutcome::AlreadyExists);
    }

    #[tokio::test]
    async fn unset_default_level_stays_null() {
        let db = Database::new();
        let svc = UserService::new(&db, None);
        let id = UserId::from("u1");

        svc.create_or_backfill(&id, "Ada", "ada@example.com")
            .await
            .unwrap();
        assert_eq!(svc.get(&id).await.unwrap().experience_level, None);

        // A null level with no configured default is not a hole to fill.
        let outcome = svc
            .create_or_backfill(&id, "Ada", "ada@example.com")
            .await
            .unwrap();
        assert_eq!(outcome, CreateOutcome::AlreadyExists);
    }

    #[tokio::test]
    async fn create_rejects_blank_arguments() {
        let db = Database::new();
        let svc = service(&db);

        for (id, name, email) in [
            ("", "Ada", "ada@example.com"),
            ("u1", " ", "ada@example.com"),
            ("u1", "Ada", ""),
        ] {
            let err = svc
                .create_or_backfill(&UserId::from(id), name, email)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidArgument(_)));
        }
    }

    #[tokio::test]
    async fn set_user_data_merges_per_field() {
        let db = Database::new();
        let svc = service(&db);
        let id = UserId::from("u1");
        svc.create_or_backfill(&id, "Ada", "ada@example.com")
            .await
            .unwrap();

        let patch = UserDataPatch {
            experience_level: Some(3),
            ..UserDataPatch::default()
        };
        svc.set_user_data(&id, &patch).await.unwrap();

        let data = svc.get_user_data(&id).await.unwrap();
        assert_eq!(data.name, "Ada");
        assert_eq!(data.experience_level, Some(3));
    }

    #[tokio::test]
    async fn set_user_data_on_missing_user_is_not_found() {
        let db = Database::new();
        let svc = service(&db);
        let patch = UserDataPatch {
            name: Some("Nobody".to_owned()),
            ..UserDataPatch::default()
        };
        let err = svc
            .set_user_data(&UserId::from("ghost"), &patch)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn set_user_data_rejects_empty_patch() {
        let db = Database::new();
        let svc = service(&db);
        let err = svc
            .set_user_data(&UserId::from("u1"), &UserDataPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }
}
