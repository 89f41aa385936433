use crate::server::state::AppState;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

/// The configuration with secret-looking options removed
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(state.config.configuration_dict.clone())
}

/// Actuator style health check
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let tasks = state.background.stats();

    Json(json!({
        "status": "UP",
        "description": "Health",
        "details": {
            "Just another check": {
                "status": "UP",
                "description": "description"
            },
            "background tasks": {
                "status": "UP",
                "description": "Tasks spawned by the benchmark routes",
                "scheduled": tasks.scheduled,
                "running": tasks.running,
                "completed": tasks.completed
            }
        }
    }))
}
