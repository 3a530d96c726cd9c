use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use certo_core::SanitizedConfig;

use crate::metrics;
use crate::state::{AppState, ClientNames};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub clients: ClientNames,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        clients: state.client_names().clone(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

pub async fn get_metrics() -> String {
    metrics::encode_metrics()
}
