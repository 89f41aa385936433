//! Benchmark endpoints
//!
//! Small handlers with fixed payloads, used to measure the overhead of the
//! HTTP stack itself.

use crate::domain::Benchmark;
use crate::server::error::ServerResult;
use crate::server::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

pub async fn hi() -> Json<&'static str> {
    Json("Hi!")
}

pub async fn json_response() -> Json<Value> {
    Json(json!({"Hello": "World", "Foo": "Bar", "Num": 1, "String": "ABC"}))
}

/// Echo the payload back after [`Benchmark::appended`]
pub async fn post_and_return_modified(
    payload: Result<Json<Benchmark>, JsonRejection>,
) -> ServerResult<Json<Benchmark>> {
    let Json(data) = payload?;
    Ok(Json(data.appended()))
}

#[derive(Debug, Deserialize)]
pub struct WaitParams {
    #[serde(default = "default_seconds")]
    pub seconds_to_wait_on_server_side: u64,
}

fn default_seconds() -> u64 {
    5
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImmediateResponse {
    pub uuid: String,
    pub received: String,
    pub response: String,
    pub seconds_to_wait_on_server_side: u64,
    /// Microseconds between receiving and answering
    pub timedelta: i64,
}

/// Schedule a sleeping task and answer without waiting for it
pub async fn immediate_response(
    State(state): State<Arc<AppState>>,
    params: Result<Query<WaitParams>, QueryRejection>,
) -> ServerResult<Json<ImmediateResponse>> {
    let Query(params) = params?;
    let task_id = uuid::Uuid::new_v4().to_string();
    let received = Local::now();

    state.background.spawn_sleep(
        task_id.clone(),
        params.seconds_to_wait_on_server_side,
        Arc::clone(&state.logger),
    );

    let response = Local::now();
    let timedelta = (response - received).num_microseconds().unwrap_or(i64::MAX);

    Ok(Json(ImmediateResponse {
        uuid: task_id,
        received: received.naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        response: response.naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        seconds_to_wait_on_server_side: params.seconds_to_wait_on_server_side,
        timedelta,
    }))
}
