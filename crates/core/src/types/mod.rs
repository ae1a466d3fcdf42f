//! Core types for the CARIT backend.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod vehicle;

pub use id::{UserId, VehicleId};
pub use vehicle::VehicleKey;
