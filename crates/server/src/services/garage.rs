//! Garage service: the many-to-many relation between users and catalog
//! entries.
//!
//! Catalog entries are shared between garages, so mutations never touch an
//! entry other users can see: `edit` is copy-on-write (the new tuple resolves
//! to its own entry and only the caller's membership is repointed) and
//! `remove` detaches the caller's reference, deleting the entry only once no
//! garage references it any more.

use carit_core::{UserId, VehicleId};

use crate::db::{Database, RepositoryError, UserRepository, VehicleRepository};
use crate::error::{AppError, Result};
use crate::models::{CatalogEntry, VehicleDescription, VehicleUpdates};

use super::MISSING_FIELDS;

/// The ownership failure message for edit/remove on a foreign vehicle.
const NOT_OWNED: &str = "Car not found in your garage";

/// Garage service.
pub struct GarageService<'a> {
    users: UserRepository<'a>,
    vehicles: VehicleRepository<'a>,
}

impl<'a> GarageService<'a> {
    /// Create a new garage service.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self {
            users: UserRepository::new(db),
            vehicles: VehicleRepository::new(db),
        }
    }

    /// The user's garage as hydrated catalog entries, in membership order.
    ///
    /// An unknown user or an empty garage yields an empty sequence; dangling
    /// references are skipped.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a blank user id.
    pub async fn list(&self, user_id: &UserId) -> Result<Vec<CatalogEntry>> {
        if user_id.is_blank() {
            return Err(AppError::InvalidArgument(MISSING_FIELDS.to_owned()));
        }
        match self.users.get(user_id).await {
            Some(doc) => Ok(self.vehicles.get_many(&doc.garage).await),
            None => Ok(Vec::new()),
        }
    }

    /// Add a vehicle to the user's garage, deduplicating both the catalog
    /// (by tuple) and the membership (by identifier string form).
    ///
    /// Returns the hydrated entry whether or not the membership changed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a blank user id or an incomplete
    /// description, and `NotFound` for an unknown user.
    pub async fn add(
        &self,
        user_id: &UserId,
        description: VehicleDescription,
    ) -> Result<CatalogEntry> {
        if user_id.is_blank() {
            return Err(AppError::InvalidArgument(MISSING_FIELDS.to_owned()));
        }
        let key = description
            .into_key()
            .ok_or_else(|| AppError::InvalidArgument(MISSING_FIELDS.to_owned()))?;

        let entry = self.vehicles.find_or_create(key).await;
        let added = self
            .users
            .add_garage_ref(user_id, &entry.id)
            .await
            .map_err(user_not_found)?;
        if added {
            tracing::debug!(user = %user_id, car = %entry.id, "garage add");
        }
        Ok(entry)
    }

    /// Apply a partial update to a vehicle in the user's garage.
    ///
    /// Copy-on-write: the merged tuple resolves through the catalog to a
    /// (possibly fresh) entry, the caller's membership is repointed, and the
    /// previous entry is deleted only when nobody references it any more.
    /// Other owners of the old tuple keep their vehicle unchanged. An edit
    /// that changes nothing succeeds without touching the store.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for blank/empty inputs, `NotFound` for an
    /// unknown user or a dangling reference, and `Forbidden` when the
    /// vehicle is not in the caller's garage.
    pub async fn edit(
        &self,
        user_id: &UserId,
        car_id: &VehicleId,
        updates: &VehicleUpdates,
    ) -> Result<()> {
        if user_id.is_blank() || car_id.as_str().is_empty() || updates.is_empty() {
            return Err(AppError::InvalidArgument(MISSING_FIELDS.to_owned()));
        }

        let doc = self
            .users
            .get(user_id)
            .await
            .ok_or_else(|| AppError::NotFound("User not found".to_owned()))?;
        if !doc.owns_vehicle(car_id) {
            return Err(AppError::Forbidden(NOT_OWNED.to_owned()));
        }

        let current = self
            .vehicles
            .get(car_id)
            .await
            .ok_or_else(|| AppError::NotFound("Car not found".to_owned()))?;

        let merged = updates.apply_to(&current.key());
        if merged == current.key() {
            return Ok(());
        }

        let replacement = self.vehicles.find_or_create(merged).await;
        self.users
            .replace_garage_ref(user_id, car_id, &replacement.id)
            .await
            .map_err(user_not_found)?;
        self.drop_if_unreferenced(car_id).await;

        tracing::debug!(user = %user_id, old = %car_id, new = %replacement.id, "garage edit");
        Ok(())
    }

    /// Remove a vehicle from the user's garage.
    ///
    /// Detaches the caller's membership (matching either persisted
    /// representation); the catalog entry itself is deleted only when its
    /// last reference disappears.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for blank inputs, `NotFound` for an unknown
    /// user, and `Forbidden` when the vehicle is not in the caller's garage.
    pub async fn remove(&self, user_id: &UserId, car_id: &VehicleId) -> Result<()> {
        if user_id.is_blank() || car_id.as_str().is_empty() {
            return Err(AppError::InvalidArgument(MISSING_FIELDS.to_owned()));
        }

        let doc = self
            .users
            .get(user_id)
            .await
            .ok_or_else(|| AppError::NotFound("User not found".to_owned()))?;
        if !doc.owns_vehicle(car_id) {
            return Err(AppError::Forbidden(NOT_OWNED.to_owned()));
        }

        self.users
            .remove_garage_ref(user_id, car_id)
            .await
            .map_err(user_not_found)?;
        self.drop_if_unreferenced(car_id).await;

        tracing::debug!(user = %user_id, car = %car_id, "garage remove");
        Ok(())
    }

    /// Delete a catalog entry once its reference count reaches zero.
    async fn drop_if_unreferenced(&self, car_id: &VehicleId) {
        if self.users.count_garage_refs(car_id).await == 0 {
            self.vehicles.delete(car_id).await;
        }
    }
}

fn user_not_found(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound("User not found".to_owned()),
    }
}
