//! The vehicle deduplication key.

use serde::{Deserialize, Serialize};

/// The `(year, make, model, trim)` tuple that identifies a distinct vehicle
/// description.
///
/// The catalog stores each key exactly once; two entries may never share all
/// four fields. An empty `trim` is a real value (a trim-less vehicle), not an
/// "unset" marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleKey {
    pub year: i32,
    pub make: String,
    pub model: String,
    #[serde(default)]
    pub trim: String,
}

impl VehicleKey {
    /// Build a key, treating an absent trim as the empty string.
    #[must_use]
    pub fn new(
        year: i32,
        make: impl Into<String>,
        model: impl Into<String>,
        trim: Option<String>,
    ) -> Self {
        Self {
            year,
            make: make.into(),
            model: model.into(),
            trim: trim.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_trim_normalizes_to_empty_string() {
        let key = VehicleKey::new(2021, "Honda", "Civic", None);
        assert_eq!(key.trim, "");
        assert_eq!(key, VehicleKey::new(2021, "Honda", "Civic", Some(String::new())));
    }

    #[test]
    fn keys_differing_only_in_trim_are_distinct() {
        let base = VehicleKey::new(2021, "Honda", "Civic", None);
        let ex = VehicleKey::new(2021, "Honda", "Civic", Some("EX".into()));
        assert_ne!(base, ex);
    }

    #[test]
    fn key_deserializes_without_trim_field() {
        let key: VehicleKey =
            serde_json::from_str(r#"{"year":2020,"make":"Toyota","model":"Camry"}"#).unwrap();
        assert_eq!(key.trim, "");
    }
}
