//! Newtype identifiers for type-safe entity references.
//!
//! Identifiers in this system are strings: user ids are opaque subject
//! identifiers minted by the external auth collaborator, and vehicle ids are
//! store-generated UUIDs. Newtypes keep the two from being mixed up.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// The opaque subject identifier assigned by the auth collaborator.
///
/// Serves as the primary key of the user document. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap a subject identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty or whitespace-only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identifier of a catalog entry (a deduplicated vehicle description).
///
/// Generated by the store on first insert of a `(year, make, model, trim)`
/// tuple. Garage membership lists were historically persisted in two
/// representations - the canonical string and a structured
/// `{"$oid": "..."}` object - so this type deserializes from either form
/// and always serializes back the canonical string. Equality is by string
/// form, which makes the two representations compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VehicleId(String);

impl VehicleId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for VehicleId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for VehicleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for VehicleId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Accept both persisted representations; normalize to the string form.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Canonical(String),
            Legacy {
                #[serde(rename = "$oid")]
                oid: String,
            },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Canonical(id) | Repr::Legacy { oid: id } => Ok(Self(id)),
        }
    }
}
