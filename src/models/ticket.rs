use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub code: String,
    pub user_id: String,
    pub competition_id: String,
    pub round_id: String,
    pub valid: bool,
    pub issued_at: String,
    pub expires_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTicketRequest {
    pub user_id: String,
    pub competition_id: String,
    pub round_id: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Serialize)]
pub struct IssueTicketResult {
    pub id: String,
    pub code: String,
}

/// Body shared by the validate and revoke endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketCheckRequest {
    pub code: String,
    pub competition_id: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateTicketResult {
    pub valid: bool,
}

#[derive(Debug, Serialize)]
pub struct RevokeTicketResult {
    pub revoked: bool,
}
