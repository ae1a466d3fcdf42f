//! HTTP route handlers.
//!
//! Handlers are thin: they translate between the wire shapes below and the
//! services, and hold no business logic. Every route except `/health`
//! requires the gateway-resolved identity header (see
//! [`crate::middleware::auth`]).
//!
//! # Route Structure
//!
//! ```text
//! GET  /health            - Liveness check (no auth)
//!
//! # Garage
//! GET  /garage            - The caller's garage, hydrated
//! POST /garage/add        - Add a vehicle {year, make, model, trim?}
//! POST /garage/edit       - Edit a vehicle {carId, updates}
//! POST /garage/remove     - Remove a vehicle {carId}
//! GET  /car-options       - Selector dropdowns ?year=&make=&model=
//!
//! # Flowcharts
//! GET  /get-flowcharts    - The caller's diagnostic history
//! POST /save-flowchart    - Persist a generated session (called by the
//!                           generation workflow)
//! POST /delete-flowchart  - Delete a history entry {index}
//!
//! # Profile
//! POST /create-user       - Create-or-backfill on first contact
//! GET  /get-user-data     - {name, email, experienceLevel}
//! POST /set-user-data     - Partial profile update
//! ```

pub mod car_options;
pub mod flowcharts;
pub mod garage;
pub mod users;

use axum::{
    Router,
    http::{HeaderName, Method, header},
    routing::{get, post},
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::auth::USER_ID_HEADER;
use crate::state::AppState;

/// Create the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/garage", get(garage::list))
        .route("/garage/add", post(garage::add))
        .route("/garage/edit", post(garage::edit))
        .route("/garage/remove", post(garage::remove))
        .route("/car-options", get(car_options::options))
        .route("/get-flowcharts", get(flowcharts::list))
        .route("/save-flowchart", post(flowcharts::save))
        .route("/delete-flowchart", post(flowcharts::delete))
        .route("/create-user", post(users::create_user))
        .route("/get-user-data", get(users::get_user_data))
        .route("/set-user-data", post(users::set_user_data))
}

/// Build the full application: routes, CORS for the browser client, and
/// request tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(state.config().allowed_origin.clone())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(USER_ID_HEADER),
        ])
        .allow_credentials(true);

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// The bare `{"success": true}` acknowledgement body.
#[derive(Debug, Serialize)]
pub struct Ack {
    success: bool,
}

impl Ack {
    pub(crate) const OK: Self = Self { success: true };
}
