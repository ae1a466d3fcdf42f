//! Vehicle selector dropdown handler.

use axum::{Json, extract::Query, extract::State};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::services::{CarOptions, CarOptionsService, OptionsFilter};
use crate::state::AppState;

/// Query parameters for `GET /car-options`.
///
/// The front end sends all three as strings; blank values mean "no filter".
#[derive(Debug, Default, Deserialize)]
pub struct OptionsQuery {
    #[serde(default)]
    year: Option<String>,
    #[serde(default)]
    make: Option<String>,
    #[serde(default)]
    model: Option<String>,
}

impl OptionsQuery {
    fn into_filter(self) -> Result<OptionsFilter> {
        let year = match self.year.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<i32>()
                    .map_err(|_| AppError::InvalidArgument(format!("invalid year: {raw}")))?,
            ),
        };
        Ok(OptionsFilter {
            year,
            make: non_blank(self.make),
            model: non_blank(self.model),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// `GET /car-options` — cascading distinct-value lists for the selector.
pub async fn options(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Query(query): Query<OptionsQuery>,
) -> Result<Json<CarOptions>> {
    let filter = query.into_filter()?;
    let options = CarOptionsService::new(state.db()).options(&filter).await;
    Ok(Json(options))
}
