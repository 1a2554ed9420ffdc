use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: HashMap<String, String>,
}

/// Health check endpoint
///
/// A vote store outage is reported as `degraded`: pages still render, voting is off.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service status", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let mut services = HashMap::new();

    let store_ok = state.voting_enabled().await;
    services.insert(
        "vote_store".to_string(),
        if store_ok { "connected" } else { "disconnected" }.to_string(),
    );
    services.insert(
        "corpus".to_string(),
        format!("{} threads", state.corpus.len()),
    );
    services.insert("sessions".to_string(), state.sessions.len().await.to_string());

    Json(HealthResponse {
        status: if store_ok { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        services,
    })
}
