use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use tolk_ballot::SessionContext;
use tolk_types::{PostRecord, ScopeKey, ThreadRecord, TranslatedText};

use crate::{
    error::{ApiError, ApiResult},
    routes::{sessions::session, stats::blinded_results, stats::DistributionView},
    state::AppState,
};

const MISSING_TRANSLATION: &str = "No translation available";
const EMPTY_CORPUS: &str = "No translated threads are available";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ThreadSummary {
    pub id: String,
    pub display_title: String,
    pub forum_title: Option<String>,
    pub posts: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ThreadListResponse {
    pub threads: Vec<ThreadSummary>,
    pub message: Option<String>,
}

/// One anonymized translation column.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ColumnView {
    /// `Model X`, or `Model X (source)` once this session voted for it.
    pub label: String,
    pub text: String,
    pub available: bool,
}

impl ColumnView {
    fn new(label: String, translated: Option<&TranslatedText>) -> Self {
        match translated {
            Some(t) => Self {
                label,
                text: t.text.clone(),
                available: true,
            },
            None => Self {
                label,
                text: MISSING_TRANSLATION.to_string(),
                available: false,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PostView {
    pub post_id: String,
    pub position: u32,
    /// `Question` for the opening post, `Reply n` after it.
    pub heading: String,
    pub username: String,
    pub original_message: String,
    pub columns: Vec<ColumnView>,
    /// Labels of the columns this session voted for.
    pub voted_for: Vec<String>,
    /// Present only after this session voted on the post.
    pub results: Option<DistributionView>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ThreadView {
    pub thread_id: String,
    pub title: String,
    pub forum_title: Option<String>,
    /// False while vote storage is unreachable; the page stays readable.
    pub voting_enabled: bool,
    pub title_columns: Vec<ColumnView>,
    pub posts: Vec<PostView>,
}

pub(crate) fn find_thread<'a>(state: &'a AppState, thread_id: &str) -> ApiResult<&'a ThreadRecord> {
    state
        .corpus
        .thread(thread_id)
        .ok_or_else(|| ApiError::ThreadNotFound(thread_id.to_string()))
}

pub(crate) fn find_post<'a>(
    state: &'a AppState,
    thread_id: &str,
    post_id: &str,
) -> ApiResult<&'a PostRecord> {
    find_thread(state, thread_id)?
        .post(post_id)
        .ok_or_else(|| ApiError::PostNotFound {
            thread_id: thread_id.to_string(),
            post_id: post_id.to_string(),
        })
}

/// List translated threads
#[utoipa::path(
    get,
    path = "/threads",
    responses(
        (status = 200, description = "Thread selector entries", body = ThreadListResponse)
    ),
    tag = "threads"
)]
pub async fn list_threads(State(state): State<Arc<AppState>>) -> Json<ThreadListResponse> {
    let threads: Vec<ThreadSummary> = state
        .corpus
        .threads()
        .iter()
        .map(|thread| ThreadSummary {
            id: thread.id.clone(),
            display_title: thread.display_title(),
            forum_title: thread.forum_title.clone(),
            posts: thread.posts.len(),
        })
        .collect();

    let message = threads.is_empty().then(|| EMPTY_CORPUS.to_string());
    Json(ThreadListResponse { threads, message })
}

/// View a thread with its translations under this session's pseudonyms
///
/// The first view of a post fixes its mapping for the rest of the session.
#[utoipa::path(
    get,
    path = "/sessions/{session_id}/threads/{thread_id}",
    params(
        ("session_id" = Uuid, Path, description = "Session ID"),
        ("thread_id" = String, Path, description = "Thread ID")
    ),
    responses(
        (status = 200, description = "Anonymized thread view", body = ThreadView),
        (status = 404, description = "Unknown session or thread")
    ),
    tag = "threads"
)]
pub async fn view_thread(
    State(state): State<Arc<AppState>>,
    Path((session_id, thread_id)): Path<(Uuid, String)>,
) -> ApiResult<Json<ThreadView>> {
    let thread = find_thread(&state, &thread_id)?;
    let shared = session(&state, session_id).await?;
    let voting_enabled = state.voting_enabled().await;
    let sources = thread.sources_within(&state.config.ballot.sources);

    let mut context = shared.lock().await;
    context.touch();
    if !sources.is_empty() {
        context.assign(ScopeKey::thread(&thread.id), sources.iter().cloned())?;
        for post in &thread.posts {
            let scope = context.post_scope(&thread.id, &post.id);
            context.assign(scope, sources.iter().cloned())?;
        }
    } else {
        tracing::warn!("Thread {} has no translations from configured sources", thread.id);
    }

    let title_columns = title_columns(&context, thread)?;

    let mut posts = Vec::with_capacity(thread.posts.len());
    for post in &thread.posts {
        let results = if context.can_see_results(&thread.id, &post.id) {
            match state.store.stats_for(&thread.id, &post.id).await {
                Ok(tally) => blinded_results(&context, &thread.id, &post.id, &tally),
                Err(e) => {
                    tracing::warn!("Results for post {} unavailable: {}", post.id, e);
                    None
                }
            }
        } else {
            None
        };

        posts.push(PostView {
            post_id: post.id.clone(),
            position: post.position,
            heading: post.heading(),
            username: post.username.clone(),
            original_message: post.original_message.clone(),
            columns: post_columns(&context, &thread.id, post)?,
            voted_for: voted_labels(&context, &thread.id, &post.id)?,
            results,
        });
    }

    tracing::debug!(
        session = %session_id,
        thread = %thread.id,
        posts = posts.len(),
        "Rendered thread view"
    );

    Ok(Json(ThreadView {
        thread_id: thread.id.clone(),
        title: thread.title.clone(),
        forum_title: thread.forum_title.clone(),
        voting_enabled,
        title_columns,
        posts,
    }))
}

/// Title columns share the thread scope and are never revealed.
fn title_columns(context: &SessionContext, thread: &ThreadRecord) -> ApiResult<Vec<ColumnView>> {
    let scope = ScopeKey::thread(&thread.id);
    let Some(mapping) = context.mapper().get(&scope) else {
        return Ok(Vec::new());
    };

    mapping
        .ordered_sources()
        .map(|source| -> ApiResult<ColumnView> {
            let label = context.mapper().resolve_display_name(&scope, source, false)?;
            Ok(ColumnView::new(label, thread.title_translations.get(source)))
        })
        .collect()
}

fn post_columns(
    context: &SessionContext,
    thread_id: &str,
    post: &PostRecord,
) -> ApiResult<Vec<ColumnView>> {
    let scope = context.post_scope(thread_id, &post.id);
    let Some(mapping) = context.mapper().get(&scope) else {
        return Ok(Vec::new());
    };

    mapping
        .ordered_sources()
        .map(|source| -> ApiResult<ColumnView> {
            let label = context.display_name(thread_id, &post.id, source)?;
            Ok(ColumnView::new(label, post.translation(source)))
        })
        .collect()
}

fn voted_labels(context: &SessionContext, thread_id: &str, post_id: &str) -> ApiResult<Vec<String>> {
    context
        .tracker()
        .voted_sources(thread_id, post_id)
        .iter()
        .map(|source| -> ApiResult<String> {
            Ok(context.display_name(thread_id, post_id, source)?)
        })
        .collect()
}
