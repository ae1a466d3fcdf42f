//! Catalog entry and vehicle wire-input types.

use serde::{Deserialize, Deserializer, Serialize, de};

use carit_core::{VehicleId, VehicleKey};

/// A deduplicated vehicle description stored once in the catalog and
/// referenced by identifier from user garages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "_id")]
    pub id: VehicleId,
    pub year: i32,
    pub make: String,
    pub model: String,
    #[serde(default)]
    pub trim: String,
}

impl CatalogEntry {
    /// The deduplication key of this entry.
    #[must_use]
    pub fn key(&self) -> VehicleKey {
        VehicleKey {
            year: self.year,
            make: self.make.clone(),
            model: self.model.clone(),
            trim: self.trim.clone(),
        }
    }

    /// Build an entry for a key under a freshly generated identifier.
    #[must_use]
    pub fn from_key(id: VehicleId, key: VehicleKey) -> Self {
        Self {
            id,
            year: key.year,
            make: key.make,
            model: key.model,
            trim: key.trim,
        }
    }
}

/// A vehicle description as submitted by clients (`POST /garage/add`).
///
/// All fields are optional at the serde level so that missing-field errors
/// surface as `InvalidArgument` with the service's message rather than as a
/// body-rejection; the front end sends `year` as either a number or a string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleDescription {
    #[serde(default, deserialize_with = "year_from_number_or_string")]
    pub year: Option<i32>,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub trim: Option<String>,
}

impl VehicleDescription {
    /// Normalize into a catalog key.
    ///
    /// Returns `None` when year, make, or model is missing or blank. An
    /// absent trim normalizes to the empty string.
    #[must_use]
    pub fn into_key(self) -> Option<VehicleKey> {
        let year = self.year?;
        let make = non_blank(self.make)?;
        let model = non_blank(self.model)?;
        Some(VehicleKey::new(year, make, model, self.trim))
    }
}

/// Partial update to a catalog entry (`POST /garage/edit`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleUpdates {
    #[serde(default, deserialize_with = "year_from_number_or_string")]
    pub year: Option<i32>,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub trim: Option<String>,
}

impl VehicleUpdates {
    /// Whether no field was supplied at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.year.is_none() && self.make.is_none() && self.model.is_none() && self.trim.is_none()
    }

    /// Apply the supplied subset of fields over an existing key.
    #[must_use]
    pub fn apply_to(&self, key: &VehicleKey) -> VehicleKey {
        VehicleKey {
            year: self.year.unwrap_or(key.year),
            make: self.make.clone().unwrap_or_else(|| key.make.clone()),
            model: self.model.clone().unwrap_or_else(|| key.model.clone()),
            trim: self.trim.clone().unwrap_or_else(|| key.trim.clone()),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Accept a year as a JSON number or a numeric string.
fn year_from_number_or_string<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(i64),
        Text(String),
    }

    match Option::<Repr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Repr::Number(n)) => i32::try_from(n)
            .map(Some)
            .map_err(|_| de::Error::custom(format!("year out of range: {n}"))),
        Some(Repr::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<i32>()
                .map(Some)
                .map_err(|_| de::Error::custom(format!("invalid year: {s}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_accepts_numeric_and_string_years() {
        let by_number: VehicleDescription =
            serde_json::from_str(r#"{"year":2021,"make":"Honda","model":"Civic"}"#).unwrap();
        let by_string: VehicleDescription =
            serde_json::from_str(r#"{"year":"2021","make":"Honda","model":"Civic"}"#).unwrap();
        assert_eq!(by_number.year, Some(2021));
        assert_eq!(by_string.year, Some(2021));
    }

    #[test]
    fn description_rejects_non_numeric_year() {
        let result = serde_json::from_str::<VehicleDescription>(
            r#"{"year":"soon","make":"Honda","model":"Civic"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn into_key_requires_year_make_and_model() {
        let missing_model: VehicleDescription =
            serde_json::from_str(r#"{"year":2021,"make":"Honda"}"#).unwrap();
        assert!(missing_model.into_key().is_none());

        let blank_make: VehicleDescription =
            serde_json::from_str(r#"{"year":2021,"make":"  ","model":"Civic"}"#).unwrap();
        assert!(blank_make.into_key().is_none());

        let complete: VehicleDescription =
            serde_json::from_str(r#"{"year":2021,"make":"Honda","model":"Civic","trim":"EX"}"#)
                .unwrap();
        let key = complete.into_key().unwrap();
        assert_eq!(key, VehicleKey::new(2021, "Honda", "Civic", Some("EX".into())));
    }

    #[test]
    fn updates_apply_only_supplied_fields() {
        let key = VehicleKey::new(2021, "Honda", "Civic", Some("EX".into()));
        let updates: VehicleUpdates = serde_json::from_str(r#"{"trim":"Sport"}"#).unwrap();
        let merged = updates.apply_to(&key);
        assert_eq!(merged, VehicleKey::new(2021, "Honda", "Civic", Some("Sport".into())));
    }

    #[test]
    fn catalog_entry_serializes_mongo_style_id() {
        let entry = CatalogEntry::from_key(
            VehicleId::from("v-1"),
            VehicleKey::new(2020, "Toyota", "Camry", None),
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["_id"], "v-1");
        assert_eq!(json["year"], 2020);
        assert_eq!(json["trim"], "");
    }
}
