//! User profile handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{UserData, UserDataPatch};
use crate::services::{MISSING_FIELDS, UserService};
use crate::state::AppState;

use super::Ack;

/// Request body for `POST /create-user`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

/// Response for `POST /create-user`, reporting what happened to the document.
#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    success: bool,
    message: &'static str,
}

/// `POST /create-user` — create-or-backfill on first authenticated contact.
pub async fn create_user(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<CreateUserRequest>,
) -> Result<Json<CreateUserResponse>> {
    let (Some(name), Some(email)) = (body.name, body.email) else {
        return Err(AppError::InvalidArgument(MISSING_FIELDS.to_owned()));
    };
    let outcome = UserService::new(state.db(), state.config().default_experience_level)
        .create_or_backfill(&user, &name, &email)
        .await?;
    Ok(Json(CreateUserResponse {
        success: true,
        message: outcome.message(),
    }))
}

/// `GET /get-user-data` — the `{name, email, experienceLevel}` projection.
pub async fn get_user_data(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<UserData>> {
    let data = UserService::new(state.db(), state.config().default_experience_level)
        .get_user_data(&user)
        .await?;
    Ok(Json(data))
}

/// `POST /set-user-data` — partial profile update, last-write-wins per field.
pub async fn set_user_data(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(patch): Json<UserDataPatch>,
) -> Result<Json<Ack>> {
    UserService::new(state.db(), state.config().default_experience_level)
        .set_user_data(&user, &patch)
        .await?;
    Ok(Json(Ack::OK))
}
