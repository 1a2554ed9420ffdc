use utoipa::OpenApi;

use crate::routes::{health, sessions, stats, threads, votes};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        sessions::start_session,
        sessions::end_session,
        threads::list_threads,
        threads::view_thread,
        votes::cast_vote,
        votes::remove_vote,
        stats::item_stats,
        stats::global_stats,
    ),
    components(schemas(
        health::HealthResponse,
        sessions::SessionResponse,
        threads::ThreadSummary,
        threads::ThreadListResponse,
        threads::ColumnView,
        threads::PostView,
        threads::ThreadView,
        votes::VoteRequest,
        votes::VoteResponse,
        stats::ShareView,
        stats::DistributionView,
        stats::ItemStatsResponse,
        stats::UsageView,
        stats::GlobalStatsResponse,
    )),
    tags(
        (name = "health", description = "Service status"),
        (name = "sessions", description = "Viewing sessions"),
        (name = "threads", description = "Anonymized translation views"),
        (name = "votes", description = "Blind voting"),
        (name = "stats", description = "Vote statistics")
    ),
    info(title = "Tolk", description = "Blind comparison of machine translations")
)]
pub struct ApiDoc;
