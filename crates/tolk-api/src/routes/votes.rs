use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    routes::{
        sessions::session,
        stats::{blinded_results, DistributionView},
        threads::find_post,
    },
    state::AppState,
    voter::VoterIdentity,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VoteRequest {
    /// Pseudonym of the chosen column, e.g. `Model B`.
    pub display_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VoteResponse {
    pub thread_id: String,
    pub post_id: String,
    /// The chosen column's label, now revealed.
    pub voted_for: String,
    pub results: Option<DistributionView>,
}

/// Vote for the best translation of a post
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/threads/{thread_id}/posts/{post_id}/votes",
    params(
        ("session_id" = Uuid, Path, description = "Session ID"),
        ("thread_id" = String, Path, description = "Thread ID"),
        ("post_id" = String, Path, description = "Post ID")
    ),
    request_body = VoteRequest,
    responses(
        (status = 201, description = "Vote recorded", body = VoteResponse),
        (status = 400, description = "Unknown display name or no translation behind it"),
        (status = 404, description = "Unknown session, thread or post"),
        (status = 409, description = "Already voted on this post, or thread not viewed yet"),
        (status = 503, description = "Vote storage unavailable")
    ),
    tag = "votes"
)]
pub async fn cast_vote(
    State(state): State<Arc<AppState>>,
    Path((session_id, thread_id, post_id)): Path<(Uuid, String, String)>,
    voter: VoterIdentity,
    Json(req): Json<VoteRequest>,
) -> ApiResult<(StatusCode, Json<VoteResponse>)> {
    let post = find_post(&state, &thread_id, &post_id)?;
    let shared = session(&state, session_id).await?;
    let mut context = shared.lock().await;
    context.touch();

    let source = context.source_for(&thread_id, &post_id, &req.display_name)?;
    if post.translation(&source).is_none() {
        return Err(ApiError::BadRequest(format!(
            "{} has no translation for this post",
            req.display_name
        )));
    }
    if context.has_voted_on(&thread_id, &post_id) {
        return Err(ApiError::AlreadyVoted(post_id));
    }

    state
        .store
        .cast(&thread_id, &post_id, &source, &voter.0)
        .await?;
    context.record_vote(&thread_id, &post_id, &source);

    tracing::info!(
        session = %session_id,
        thread = %thread_id,
        post = %post_id,
        "Vote cast for {}",
        req.display_name
    );

    let results = match state.store.stats_for(&thread_id, &post_id).await {
        Ok(tally) => blinded_results(&context, &thread_id, &post_id, &tally),
        Err(e) => {
            tracing::warn!("Vote recorded but results unavailable: {}", e);
            None
        }
    };
    let voted_for = context.display_name(&thread_id, &post_id, &source)?;

    Ok((
        StatusCode::CREATED,
        Json(VoteResponse {
            thread_id,
            post_id,
            voted_for,
            results,
        }),
    ))
}

/// Withdraw this session's vote for one column of a post
#[utoipa::path(
    delete,
    path = "/sessions/{session_id}/threads/{thread_id}/posts/{post_id}/votes",
    params(
        ("session_id" = Uuid, Path, description = "Session ID"),
        ("thread_id" = String, Path, description = "Thread ID"),
        ("post_id" = String, Path, description = "Post ID")
    ),
    request_body = VoteRequest,
    responses(
        (status = 204, description = "Vote removed"),
        (status = 404, description = "Unknown session, post or vote"),
        (status = 503, description = "Vote storage unavailable")
    ),
    tag = "votes"
)]
pub async fn remove_vote(
    State(state): State<Arc<AppState>>,
    Path((session_id, thread_id, post_id)): Path<(Uuid, String, String)>,
    voter: VoterIdentity,
    Json(req): Json<VoteRequest>,
) -> ApiResult<StatusCode> {
    find_post(&state, &thread_id, &post_id)?;
    let shared = session(&state, session_id).await?;
    let mut context = shared.lock().await;
    context.touch();

    let source = context.source_for(&thread_id, &post_id, &req.display_name)?;
    if !context.has_voted(&thread_id, &post_id, &source) {
        return Err(ApiError::VoteNotFound(req.display_name));
    }

    let deleted = state
        .store
        .revoke_source(&thread_id, &post_id, &voter.0, &source)
        .await?;
    if deleted == 0 {
        // Voter address changed since the vote; the stored record stays.
        tracing::warn!(
            session = %session_id,
            thread = %thread_id,
            post = %post_id,
            "No stored vote matched {}",
            voter.0
        );
    }
    context.clear_vote(&thread_id, &post_id, &source);

    Ok(StatusCode::NO_CONTENT)
}
