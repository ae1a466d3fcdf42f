//! Domain document types.
//!
//! These are the shapes persisted in the document store and (for the most
//! part) exposed on the wire; serde field names follow the historical
//! document layout (`_id`, camelCase).

pub mod user;
pub mod vehicle;

pub use user::{Flowchart, QuestionAnswer, UserData, UserDataPatch, UserDocument};
pub use vehicle::{CatalogEntry, VehicleDescription, VehicleUpdates};
