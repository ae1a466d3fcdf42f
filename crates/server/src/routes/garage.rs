//! Garage handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use carit_core::VehicleId;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{CatalogEntry, VehicleDescription, VehicleUpdates};
use crate::services::{GarageService, MISSING_FIELDS};
use crate::state::AppState;

use super::Ack;

/// Response for a successful garage add.
#[derive(Debug, Serialize)]
pub struct AddCarResponse {
    success: bool,
    car: CatalogEntry,
}

/// Request body for `POST /garage/edit`.
#[derive(Debug, Deserialize)]
pub struct EditCarRequest {
    #[serde(default, rename = "carId")]
    car_id: Option<VehicleId>,
    #[serde(default)]
    updates: Option<VehicleUpdates>,
}

/// Request body for `POST /garage/remove`.
#[derive(Debug, Deserialize)]
pub struct RemoveCarRequest {
    #[serde(default, rename = "carId")]
    car_id: Option<VehicleId>,
}

/// `GET /garage` — the caller's garage as hydrated catalog entries.
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<CatalogEntry>>> {
    let cars = GarageService::new(state.db()).list(&user).await?;
    Ok(Json(cars))
}

/// `POST /garage/add` — add a vehicle, deduplicating catalog and membership.
pub async fn add(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<VehicleDescription>,
) -> Result<Json<AddCarResponse>> {
    let car = GarageService::new(state.db()).add(&user, body).await?;
    Ok(Json(AddCarResponse { success: true, car }))
}

/// `POST /garage/edit` — apply a partial update to an owned vehicle.
pub async fn edit(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<EditCarRequest>,
) -> Result<Json<Ack>> {
    let (Some(car_id), Some(updates)) = (body.car_id, body.updates) else {
        return Err(AppError::InvalidArgument(MISSING_FIELDS.to_owned()));
    };
    GarageService::new(state.db())
        .edit(&user, &car_id, &updates)
        .await?;
    Ok(Json(Ack::OK))
}

/// `POST /garage/remove` — detach an owned vehicle from the garage.
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<RemoveCarRequest>,
) -> Result<Json<Ack>> {
    let Some(car_id) = body.car_id else {
        return Err(AppError::InvalidArgument(MISSING_FIELDS.to_owned()));
    };
    GarageService::new(state.db()).remove(&user, &car_id).await?;
    Ok(Json(Ack::OK))
}
