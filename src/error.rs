use ntex::http::StatusCode;
use ntex::web::{HttpResponse, WebResponseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid ticket")]
    InvalidTicket,
    #[error("Bracket not found: {0}")]
    BracketNotFound(String),
    #[error("Match not found: {0}")]
    MatchNotFound(String),
    #[error("Wrap report not found: {0}")]
    ReportNotFound(String),
    #[error("Competition not found: {0}")]
    CompetitionNotFound(String),
    #[error("Data corrupt: {0}")]
    DataCorrupt(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Leaderboard aggregation failed: {0}")]
    AggregationFailure(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl WebResponseError for AppError {
    fn error_response(&self, _: &ntex::web::HttpRequest) -> HttpResponse {
        let (status, message) = match self {
            AppError::Db(_) | AppError::Json(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
            AppError::InvalidTicket => (StatusCode::FORBIDDEN, "Invalid ticket"),
            AppError::BracketNotFound(_) => (StatusCode::NOT_FOUND, "Bracket not found"),
            AppError::MatchNotFound(_) => (StatusCode::NOT_FOUND, "Match not found"),
            AppError::ReportNotFound(_) => (StatusCode::NOT_FOUND, "Wrap report not found"),
            AppError::CompetitionNotFound(_) => {
                (StatusCode::NOT_FOUND, "Competition not found")
            }
            AppError::DataCorrupt(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Bracket data corrupt"),
            AppError::Conflict(_) => (
                StatusCode::CONFLICT,
                "Bracket was modified concurrently, retry the request",
            ),
            AppError::AggregationFailure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Leaderboard update failed")
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
        };
        HttpResponse::build(status).json(&serde_json::json!({ "error": message }))
    }
}
