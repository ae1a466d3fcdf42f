//! Document store for the CARIT service.
//!
//! The data model is document-shaped: per-document atomic reads and writes,
//! no cross-document transactions. This module provides that contract
//! in-process: two collections (`users`, `vehicles`) behind `tokio` RwLocks,
//! so every exposed operation is atomic with respect to the documents it
//! touches. The repositories in [`users`] and [`vehicles`] are the only way
//! the rest of the crate reaches the collections.
//!
//! Two operations are deliberately store-side primitives rather than
//! read-modify-write sequences in the services:
//!
//! - vehicle `find_or_create` runs under the collection write lock against a
//!   unique `(year, make, model, trim)` index, so concurrent identical
//!   inserts cannot produce duplicate catalog entries;
//! - `push_flowchart` trims-then-appends under the write lock, so concurrent
//!   appends serialize instead of losing one update.
//!
//! # Snapshots
//!
//! When configured with a data file, the store loads a JSON snapshot at
//! startup and writes one on graceful shutdown. Snapshots written by older
//! deployments may carry garage references in the legacy `{"$oid": ...}`
//! form; loading normalizes them to canonical strings.

pub mod users;
pub mod vehicles;

pub use users::UserRepository;
pub use vehicles::VehicleRepository;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

use carit_core::{VehicleId, VehicleKey};

use crate::models::{CatalogEntry, UserDocument};

/// Errors produced by repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The referenced user document does not exist.
    #[error("user not found")]
    NotFound,
}

/// Errors loading or writing a store snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The serialized form of the whole store.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    users: Vec<UserDocument>,
    #[serde(default)]
    vehicles: Vec<CatalogEntry>,
}

/// The in-memory document store.
///
/// Cheap to clone; all clones share the same collections.
#[derive(Clone, Default)]
pub struct Database {
    inner: Arc<Collections>,
}

#[derive(Default)]
struct Collections {
    users: RwLock<HashMap<String, UserDocument>>,
    vehicles: RwLock<VehicleCollection>,
}

/// The vehicle collection plus its unique tuple index.
///
/// Invariant: `by_key` maps every stored entry's key to its id and nothing
/// else; both maps are only ever mutated together under the write lock.
#[derive(Default)]
pub(crate) struct VehicleCollection {
    pub(crate) entries: HashMap<String, CatalogEntry>,
    pub(crate) by_key: HashMap<VehicleKey, VehicleId>,
}

impl Database {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a JSON snapshot file.
    ///
    /// A missing file yields an empty store so first boots work without
    /// ceremony.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if the file exists but cannot be read or
    /// decoded.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let raw = std::fs::read(path)?;
        let snapshot: Snapshot = serde_json::from_slice(&raw)?;

        let users = snapshot
            .users
            .into_iter()
            .map(|doc| (doc.id.as_str().to_owned(), doc))
            .collect();

        let mut vehicles = VehicleCollection::default();
        for entry in snapshot.vehicles {
            vehicles.by_key.insert(entry.key(), entry.id.clone());
            vehicles.entries.insert(entry.id.as_str().to_owned(), entry);
        }

        Ok(Self {
            inner: Arc::new(Collections {
                users: RwLock::new(users),
                vehicles: RwLock::new(vehicles),
            }),
        })
    }

    /// Write the store out as a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Io` if the file cannot be written.
    pub async fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let snapshot = {
            let users = self.inner.users.read().await;
            let vehicles = self.inner.vehicles.read().await;
            Snapshot {
                users: users.values().cloned().collect(),
                vehicles: vehicles.entries.values().cloned().collect(),
            }
        };

        let raw = serde_json::to_vec_pretty(&snapshot)?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    pub(crate) fn users(&self) -> &RwLock<HashMap<String, UserDocument>> {
        &self.inner.users
    }

    pub(crate) fn vehicles(&self) -> &RwLock<VehicleCollection> {
        &self.inner.vehicles
    }
}
