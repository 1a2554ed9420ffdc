use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use tolk_types::ScopeGranularity;

use crate::{
    error::{ApiError, ApiResult},
    sessions::SharedSession,
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub session_id: Uuid,
    /// `post` or `thread`: how widely one pseudonym mapping applies.
    pub scope: String,
}

/// Start a viewing session
#[utoipa::path(
    post,
    path = "/sessions",
    responses(
        (status = 201, description = "Session started", body = SessionResponse)
    ),
    tag = "sessions"
)]
pub async fn start_session(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<SessionResponse>) {
    let session_id = state.sessions.start().await;
    let scope = match state.sessions.granularity() {
        ScopeGranularity::Thread => "thread",
        ScopeGranularity::Post => "post",
    };

    (
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id,
            scope: scope.to_string(),
        }),
    )
}

/// End a viewing session, discarding its mappings and vote state
#[utoipa::path(
    delete,
    path = "/sessions/{session_id}",
    params(
        ("session_id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 204, description = "Session ended"),
        (status = 404, description = "Session not found")
    ),
    tag = "sessions"
)]
pub async fn end_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if state.sessions.end(session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound(session_id))
    }
}

pub(crate) async fn session(state: &AppState, session_id: Uuid) -> ApiResult<SharedSession> {
    state
        .sessions
        .get(session_id)
        .await
        .ok_or(ApiError::SessionNotFound(session_id))
}
