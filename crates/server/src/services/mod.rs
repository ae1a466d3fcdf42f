//! Business logic services.
//!
//! # Services
//!
//! - `users` - profile lifecycle: idempotent create-or-backfill, profile
//!   projections, partial updates
//! - `garage` - the user↔catalog relation: list/add/edit/remove with
//!   ownership enforcement
//! - `car_options` - cascading distinct-value queries for the vehicle
//!   selector dropdowns
//! - `flowcharts` - the bounded diagnostic-session history
//!
//! Services wrap the repositories in [`crate::db`]; they are constructed per
//! request from [`crate::state::AppState`] and hold no state of their own.

pub mod car_options;
pub mod flowcharts;
pub mod garage;
pub mod users;

pub use car_options::{CarOptions, CarOptionsService, OptionsFilter};
pub use flowcharts::{FlowchartService, MAX_FLOWCHARTS};
pub use garage::GarageService;
pub use users::{CreateOutcome, UserService};

/// The validation failure message for missing or blank required input.
pub(crate) const MISSING_FIELDS: &str = "Missing required fields";
