use crate::models::bracket::MatchStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub wins: i64,
    pub losses: i64,
    pub total_points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMatch {
    pub match_id: String,
    pub players: Vec<Option<String>>,
    pub scores: BTreeMap<String, Option<f64>>,
    pub winner: Option<String>,
    pub status: MatchStatus,
    pub round_number: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_players: i64,
    pub completed_matches: i64,
    pub average_points_per_player: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrapReport {
    pub competition_id: String,
    pub completed_at: String,
    pub champion: Option<String>,
    pub total_matches: i64,
    pub total_rounds: i64,
    pub matches: Vec<ReportMatch>,
    pub stats: BTreeMap<String, PlayerStats>,
    pub summary: ReportSummary,
}

#[derive(Debug, Serialize)]
pub struct WrapReportExists {
    pub exists: bool,
}
