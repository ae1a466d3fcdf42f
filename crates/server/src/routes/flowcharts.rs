//! Flowchart history handlers.

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Flowchart, QuestionAnswer, VehicleDescription};
use crate::services::{FlowchartService, MISSING_FIELDS};
use crate::state::AppState;

use super::Ack;

/// Request body for `POST /save-flowchart`, sent by the generation workflow.
#[derive(Debug, Deserialize)]
pub struct SaveFlowchartRequest {
    #[serde(default)]
    flowchart: Option<String>,
    #[serde(default)]
    vehicle: Option<VehicleDescription>,
    #[serde(default)]
    issues: Option<String>,
    #[serde(default)]
    responses: Option<Vec<QuestionAnswer>>,
}

/// Request body for `POST /delete-flowchart`.
#[derive(Debug, Deserialize)]
pub struct DeleteFlowchartRequest {
    #[serde(default)]
    index: Option<i64>,
}

/// `GET /get-flowcharts` — the caller's history, oldest first.
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Flowchart>>> {
    let history = FlowchartService::new(state.db()).list(&user).await?;
    Ok(Json(history))
}

/// `POST /save-flowchart` — persist a generated diagnostic session.
pub async fn save(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<SaveFlowchartRequest>,
) -> Result<Json<Ack>> {
    let (Some(flowchart), Some(vehicle), Some(issues), Some(responses)) =
        (body.flowchart, body.vehicle, body.issues, body.responses)
    else {
        return Err(AppError::InvalidArgument(MISSING_FIELDS.to_owned()));
    };
    FlowchartService::new(state.db())
        .save(&user, &flowchart, vehicle, &issues, responses)
        .await?;
    Ok(Json(Ack::OK))
}

/// `POST /delete-flowchart` — delete a history entry by index.
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<DeleteFlowchartRequest>,
) -> Result<Json<Ack>> {
    let Some(index) = body.index else {
        return Err(AppError::InvalidArgument(MISSING_FIELDS.to_owned()));
    };
    FlowchartService::new(state.db()).delete_at(&user, index).await?;
    Ok(Json(Ack::OK))
}
