use crate::models::wrap_report::WrapReport;
use serde::{Deserialize, Serialize};

pub const GLOBAL_SCOPE: &str = "global";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub scope: String,
    pub player_id: String,
    pub wins: i64,
    pub losses: i64,
    pub total_points: f64,
    pub titles: i64,
    pub games_played: i64,
    pub last_updated: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardUpdateRequest {
    pub report: WrapReport,
    pub game_id: String,
    pub league_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<i64>,
}
