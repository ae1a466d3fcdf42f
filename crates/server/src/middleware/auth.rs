//! Identity extractor for the gateway-resolved user.
//!
//! Token validation and identity resolution happen outside this service: the
//! auth gateway verifies the bearer token and forwards the resolved subject
//! identifier in the `userid` header. This extractor only reads that header;
//! it never sees credentials.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use carit_core::UserId;

/// The header carrying the externally resolved subject identifier.
pub const USER_ID_HEADER: &str = "userid";

/// Extractor that requires a resolved user identity on the request.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(AuthUser(user): AuthUser) -> impl IntoResponse {
///     format!("hello, {user}")
/// }
/// ```
pub struct AuthUser(pub UserId);

/// Rejection when the identity header is missing or blank.
pub struct MissingIdentity;

impl IntoResponse for MissingIdentity {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Missing user identity" })),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = MissingIdentity;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(MissingIdentity)?;

        Ok(Self(UserId::from(value)))
    }
}
