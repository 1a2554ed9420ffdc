use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use tolk_ballot::{Distribution, SessionContext};
use tolk_types::{UsageTotals, VoteTally};

use crate::{
    error::{ApiError, ApiResult},
    routes::{sessions::session, threads::find_post},
    state::AppState,
};

/// Label for a voted source that is not part of the viewer's mapping.
const UNLISTED_LABEL: &str = "Unlisted source";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShareView {
    /// Display name for blinded views, real source id on the operator page.
    pub label: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DistributionView {
    pub total: u64,
    pub shares: Vec<ShareView>,
}

impl From<Distribution> for DistributionView {
    fn from(dist: Distribution) -> Self {
        Self {
            total: dist.total,
            shares: dist
                .shares
                .into_iter()
                .map(|share| ShareView {
                    label: share.source,
                    count: share.count,
                    percentage: share.percentage,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemStatsResponse {
    pub thread_id: String,
    pub post_id: String,
    /// Absent when nobody has voted on the post.
    pub results: Option<DistributionView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UsageView {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    pub translations: u64,
    pub unreported: u64,
}

impl From<UsageTotals> for UsageView {
    fn from(usage: UsageTotals) -> Self {
        Self {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
            translations: usage.translations,
            unreported: usage.unreported,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GlobalStatsResponse {
    pub storage_available: bool,
    /// Vote shares keyed by real source id. Absent with no votes or no storage.
    pub votes: Option<DistributionView>,
    pub token_usage: BTreeMap<String, UsageView>,
}

/// Results for one post as this session may see them: sources the session
/// voted for are revealed, the rest keep their pseudonyms.
pub(crate) fn blinded_results(
    context: &SessionContext,
    thread_id: &str,
    post_id: &str,
    tally: &VoteTally,
) -> Option<DistributionView> {
    Distribution::from_tally(tally).map(|dist| {
        dist.relabel(|source| {
            context
                .display_name(thread_id, post_id, source)
                .unwrap_or_else(|_| UNLISTED_LABEL.to_string())
        })
        .into()
    })
}

/// Vote distribution for one post, visible only after this session voted on it
#[utoipa::path(
    get,
    path = "/sessions/{session_id}/threads/{thread_id}/posts/{post_id}/stats",
    params(
        ("session_id" = Uuid, Path, description = "Session ID"),
        ("thread_id" = String, Path, description = "Thread ID"),
        ("post_id" = String, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Blinded vote distribution", body = ItemStatsResponse),
        (status = 403, description = "Session has not voted on this post"),
        (status = 404, description = "Unknown session, thread or post"),
        (status = 503, description = "Vote storage unavailable")
    ),
    tag = "stats"
)]
pub async fn item_stats(
    State(state): State<Arc<AppState>>,
    Path((session_id, thread_id, post_id)): Path<(Uuid, String, String)>,
) -> ApiResult<Json<ItemStatsResponse>> {
    find_post(&state, &thread_id, &post_id)?;
    let shared = session(&state, session_id).await?;
    let mut context = shared.lock().await;
    context.touch();

    if !context.can_see_results(&thread_id, &post_id) {
        return Err(ApiError::ResultsHidden);
    }

    let tally = state.store.stats_for(&thread_id, &post_id).await?;
    let results = blinded_results(&context, &thread_id, &post_id, &tally);

    Ok(Json(ItemStatsResponse {
        thread_id,
        post_id,
        results,
    }))
}

/// Operator statistics: vote shares by real source id and corpus token usage
#[utoipa::path(
    get,
    path = "/stats",
    responses(
        (status = 200, description = "Global statistics", body = GlobalStatsResponse)
    ),
    tag = "stats"
)]
pub async fn global_stats(State(state): State<Arc<AppState>>) -> Json<GlobalStatsResponse> {
    let (storage_available, votes) = match state.store.stats_global().await {
        Ok(tally) => (true, Distribution::from_tally(&tally).map(Into::into)),
        Err(e) => {
            tracing::warn!("Global vote statistics unavailable: {}", e);
            (false, None)
        }
    };

    let token_usage = state
        .corpus
        .token_usage()
        .into_iter()
        .map(|(source, usage)| (source, usage.into()))
        .collect();

    Json(GlobalStatsResponse {
        storage_available,
        votes,
        token_usage,
    })
}
