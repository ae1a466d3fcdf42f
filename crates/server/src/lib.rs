//! CARIT server library.
//!
//! Backend for the CARIT vehicle-diagnostics assistant: user profiles, a
//! deduplicated vehicle catalog with per-user garages, and a bounded history
//! of generated diagnostic flowcharts.
//!
//! This crate exposes the server as a library so the binary stays thin and
//! the full router can be exercised in tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
