//! API route handlers
//!
//! - `config`: configuration dump and actuator health
//! - `benchmark`: endpoints for load testing the stack

pub mod benchmark;
pub mod config;

use super::error::{ServerError, ServerResult};
use super::state::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

/// API title and version
///
/// # Response
///
/// ```json
/// {
///   "title": "API Template (API ID: 1)",
///   "version": "1.0.0",
///   "endpoints": ["..."]
/// }
/// ```
pub async fn api_info(State(state): State<Arc<AppState>>) -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "title": format!("API Template (API ID: {})", state.config.api_id),
        "version": state.config.api_version,
        "endpoints": [
            "/config",
            "/actuator/health",
            "/benchmark/hi",
            "/benchmark/json",
            "/benchmark/json/post_and_return_modified",
            "/benchmark/backgroundtask/immediate_response"
        ]
    })))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
