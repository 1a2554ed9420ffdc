use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use tolk_ballot::BallotError;
use tolk_persist::PersistError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Thread not found: {0}")]
    ThreadNotFound(String),

    #[error("Post {post_id} not found in thread {thread_id}")]
    PostNotFound { thread_id: String, post_id: String },

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("This session already voted on post {0}")]
    AlreadyVoted(String),

    #[error("No vote for {0} to remove")]
    VoteNotFound(String),

    #[error("Results are shown after voting on this post")]
    ResultsHidden,

    #[error("Ballot error: {0}")]
    Ballot(#[from] BallotError),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::SessionNotFound(_)
            | ApiError::ThreadNotFound(_)
            | ApiError::PostNotFound { .. }
            | ApiError::VoteNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::AlreadyVoted(_) => (StatusCode::CONFLICT, self.to_string()),
            ApiError::ResultsHidden => (StatusCode::FORBIDDEN, self.to_string()),
            ApiError::Ballot(ref e) => match e {
                BallotError::UnknownScope(_) => (
                    StatusCode::CONFLICT,
                    "View the thread before voting on it".to_string(),
                ),
                BallotError::InvalidDisplayName(_) | BallotError::OutOfRange { .. } => {
                    (StatusCode::BAD_REQUEST, e.to_string())
                }
                BallotError::EmptySourceSet | BallotError::UnknownSource { .. } => {
                    tracing::error!("Ballot error: {}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
                }
            },
            ApiError::Persist(ref e) if e.is_unavailable() => {
                tracing::warn!("Vote storage unavailable: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Voting is temporarily unavailable".to_string(),
                )
            }
            ApiError::Persist(ref e) => {
                tracing::error!("Persistence error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use tolk_types::ScopeKey;

    fn status(error: ApiError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(status(ApiError::BadRequest("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status(ApiError::ThreadNotFound("1".into())), StatusCode::NOT_FOUND);
        assert_eq!(status(ApiError::AlreadyVoted("7".into())), StatusCode::CONFLICT);
        assert_eq!(status(ApiError::ResultsHidden), StatusCode::FORBIDDEN);
        assert_eq!(
            status(ApiError::Persist(PersistError::StorageUnavailable("down".into()))),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status(ApiError::Persist(PersistError::Internal("bug".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_ballot_errors() {
        assert_eq!(
            status(BallotError::UnknownScope(ScopeKey::thread("1")).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status(BallotError::InvalidDisplayName("?".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(BallotError::EmptySourceSet.into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status(
                BallotError::UnknownSource {
                    scope: ScopeKey::post("1", "2"),
                    model: "mystery".into(),
                }
                .into()
            ),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
