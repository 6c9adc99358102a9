//! API route handlers
//!
//! - `health`: liveness and readiness
//! - `matching`: single and bulk matching
//! - `catalog`: schema, catalog statistics and reload

pub mod catalog;
pub mod health;
pub mod matching;

use crate::error::{ServerError, ServerResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info
///
/// ```json
/// {
///   "name": "Planet Finder Server",
///   "version": "0.1.0",
///   "api_version": "v1",
///   "endpoints": ["..."]
/// }
/// ```
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "Planet Finder Server",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1",
        "endpoints": [
            "/api/v1/schema",
            "/api/v1/match",
            "/api/v1/match/bulk",
            "/api/v1/match/bulk/csv",
            "/api/v1/catalog/stats",
            "/api/v1/catalog/reload",
            "/health",
            "/ready"
        ]
    })))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
