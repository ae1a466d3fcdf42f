//! CARIT Core - Shared types library.
//!
//! This crate provides common types used across the CARIT backend, chiefly
//! by `carit-server`, the diagnostics-assistant API service.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no store access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Identifier newtypes and the vehicle deduplication key

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
