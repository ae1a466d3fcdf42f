//! Cascading distinct-value queries for the vehicle selector.
//!
//! Each dropdown level is constrained by the selections at or above it in
//! the year→make→model→trim hierarchy: years are unconstrained, makes are
//! narrowed by year, models by year+make, and trims only materialize once
//! all three levels are chosen. The four queries are pure reads and run
//! concurrently.

use serde::Serialize;

use crate::db::{Database, VehicleRepository};
use crate::db::vehicles::{StringField, VehicleFilter};

/// The (possibly partial) selection the client has made so far.
#[derive(Debug, Clone, Default)]
pub struct OptionsFilter {
    pub year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
}

/// Dropdown choices for each selector level.
#[derive(Debug, Clone, Serialize)]
pub struct CarOptions {
    pub years: Vec<i32>,
    pub makes: Vec<String>,
    pub models: Vec<String>,
    pub trims: Vec<String>,
}

/// Car options query service.
pub struct CarOptionsService<'a> {
    vehicles: VehicleRepository<'a>,
}

impl<'a> CarOptionsService<'a> {
    /// Create a new car options service.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self {
            vehicles: VehicleRepository::new(db),
        }
    }

    /// Compute the four dropdown lists for the current selection.
    pub async fn options(&self, filter: &OptionsFilter) -> CarOptions {
        let years_filter = VehicleFilter::default();
        let makes_filter = VehicleFilter {
            year: filter.year,
            ..VehicleFilter::default()
        };
        let models_filter = VehicleFilter {
            year: filter.year,
            make: filter.make.clone(),
            ..VehicleFilter::default()
        };
        let trims_filter = VehicleFilter {
            year: filter.year,
            make: filter.make.clone(),
            model: filter.model.clone(),
        };
        let trims_enabled =
            filter.year.is_some() && filter.make.is_some() && filter.model.is_some();

        let (years, makes, models, trims) = tokio::join!(
            self.vehicles.distinct_years(&years_filter),
            self.vehicles.distinct_strings(StringField::Make, &makes_filter),
            self.vehicles.distinct_strings(StringField::Model, &models_filter),
            async {
                if trims_enabled {
                    self.vehicles
                        .distinct_strings(StringField::Trim, &trims_filter)
                        .await
                } else {
                    Vec::new()
                }
            },
        );

        CarOptions {
            years,
            makes,
            models,
            trims,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use carit_core::VehicleKey;

    async fn seed(db: &Database) {
        let repo = VehicleRepository::new(db);
        for (year, make, model, trim) in [
            (2020, "Toyota", "Camry", "SE"),
            (2020, "Toyota", "Camry", "LE"),
            (2020, "Toyota", "Corolla", "LE"),
            (2021, "Honda", "Civic", "EX"),
            (2021, "Honda", "Civic", ""),
        ] {
            repo.find_or_create(VehicleKey::new(year, make, model, Some(trim.to_owned())))
                .await;
        }
    }

    #[tokio::test]
    async fn unfiltered_query_returns_everything_but_trims() {
        let db = Database::new();
        seed(&db).await;
        let svc = CarOptionsService::new(&db);

        let options = svc.options(&OptionsFilter::default()).await;
        assert_eq!(options.years, vec![2021, 2020]);
        assert_eq!(options.makes, vec!["Honda".to_owned(), "Toyota".to_owned()]);
        assert_eq!(
            options.models,
            vec!["Camry".to_owned(), "Civic".to_owned(), "Corolla".to_owned()]
        );
        assert!(options.trims.is_empty());
    }

    #[tokio::test]
    async fn each_level_is_constrained_by_the_levels_above() {
        let db = Database::new();
        seed(&db).await;
        let svc = CarOptionsService::new(&db);

        let options = svc
            .options(&OptionsFilter {
                year: Some(2020),
                make: Some("Toyota".to_owned()),
                model: None,
            })
            .await;
        // Years stay unconstrained so the user can re-pick.
        assert_eq!(options.years, vec![2021, 2020]);
        assert_eq!(options.makes, vec!["Toyota".to_owned()]);
        assert_eq!(options.models, vec!["Camry".to_owned(), "Corolla".to_owned()]);
        assert!(options.trims.is_empty(), "trims need all three filters");
    }

    #[tokio::test]
    async fn trims_materialize_only_with_full_selection() {
        let db = Database::new();
        seed(&db).await;
        let svc = CarOptionsService::new(&db);

        let options = svc
            .options(&OptionsFilter {
                year: Some(2020),
                make: Some("Toyota".to_owned()),
                model: Some("Camry".to_owned()),
            })
            .await;
        assert_eq!(options.trims, vec!["LE".to_owned(), "SE".to_owned()]);

        // The empty Civic trim never shows up as a choice.
        let options = svc
            .options(&OptionsFilter {
                year: Some(2021),
                make: Some("Honda".to_owned()),
                model: Some("Civic".to_owned()),
            })
            .await;
        assert_eq!(options.trims, vec!["EX".to_owned()]);
    }
}
