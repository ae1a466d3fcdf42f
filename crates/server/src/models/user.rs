//! User document and profile projection types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use carit_core::{UserId, VehicleId, VehicleKey};

/// A single question/answer exchange from the diagnostic interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub question: String,
    pub answer: String,
}

/// A stored diagnostic session: the generated flowchart payload plus the
/// context that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flowchart {
    /// The generated flowchart content (opaque to this service).
    pub flowchart: String,
    /// The vehicle the session was about.
    pub vehicle: VehicleKey,
    /// The user's issue description.
    pub issues: String,
    /// The interview exchanges that produced the flowchart.
    pub responses: Vec<QuestionAnswer>,
}

/// The user document as persisted in the `users` collection.
///
/// Field names mirror the historical document layout (`_id`, camelCase).
/// Every field except the id carries a serde default so that documents
/// written before a field existed still load; such holes are what the
/// create-or-backfill path repairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub attitude: String,
    #[serde(default)]
    pub crash_out: i64,
    #[serde(default)]
    pub experience_level: Option<i32>,
    #[serde(default)]
    pub flowcharts: Vec<Flowchart>,
    #[serde(default)]
    pub garage: Vec<VehicleId>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl UserDocument {
    /// A fresh document with creation defaults.
    #[must_use]
    pub fn new(id: UserId, name: String, email: String, experience_level: Option<i32>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            email,
            attitude: String::new(),
            crash_out: 0,
            experience_level,
            flowcharts: Vec::new(),
            garage: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the garage holds `id`, comparing by string form so legacy
    /// representations are matched too.
    #[must_use]
    pub fn owns_vehicle(&self, id: &VehicleId) -> bool {
        self.garage.iter().any(|v| v.as_str() == id.as_str())
    }
}

/// The profile projection exposed on `GET /get-user-data`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub name: String,
    pub email: String,
    pub experience_level: Option<i32>,
}

impl From<&UserDocument> for UserData {
    fn from(doc: &UserDocument) -> Self {
        Self {
            name: doc.name.clone(),
            email: doc.email.clone(),
            experience_level: doc.experience_level,
        }
    }
}

/// Partial profile update accepted on `POST /set-user-data`.
///
/// Only the listed fields may be written through this path; anything else in
/// the body is ignored rather than merged into the document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDataPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub experience_level: Option<i32>,
}

impl UserDataPatch {
    /// Whether no writable field was supplied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.experience_level.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_loads_with_missing_fields_defaulted() {
        let doc: UserDocument = serde_json::from_str(r#"{"_id":"auth0|42"}"#).unwrap();
        assert_eq!(doc.name, "");
        assert_eq!(doc.crash_out, 0);
        assert_eq!(doc.experience_level, None);
        assert!(doc.flowcharts.is_empty());
        assert!(doc.garage.is_empty());
    }

    #[test]
    fn garage_membership_matches_legacy_representation() {
        let doc: UserDocument =
            serde_json::from_str(r#"{"_id":"u1","garage":[{"$oid":"abc"},"def"]}"#).unwrap();
        assert!(doc.owns_vehicle(&VehicleId::from("abc")));
        assert!(doc.owns_vehicle(&VehicleId::from("def")));
        assert!(!doc.owns_vehicle(&VehicleId::from("ghi")));
    }

    #[test]
    fn user_data_projection_uses_camel_case() {
        let doc = UserDocument::new(UserId::from("u1"), "Ada".into(), "ada@example.com".into(), Some(2));
        let json = serde_json::to_value(UserData::from(&doc)).unwrap();
        assert_eq!(json["name"], "Ada");
        assert_eq!(json["experienceLevel"], 2);
    }
}
