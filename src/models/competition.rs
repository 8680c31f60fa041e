#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompetitionStatus {
    Active,
    Completed,
}

impl CompetitionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CompetitionStatus::Active => "active",
            CompetitionStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(CompetitionStatus::Active),
            "completed" => Some(CompetitionStatus::Completed),
            _ => None,
        }
    }
}

/// The slice of a competition record this service reads: its status and the
/// leaderboard scopes it rolls up into.
#[derive(Debug, Clone)]
pub struct Competition {
    pub status: CompetitionStatus,
    pub game_id: Option<String>,
    pub league_id: Option<String>,
}
