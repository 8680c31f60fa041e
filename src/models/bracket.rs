use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Pending,
    Live,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    #[serde(default)]
    pub match_id: String,
    /// Player slots. A slot is `None` until someone advances into it.
    #[serde(default)]
    pub players: Vec<Option<String>>,
    #[serde(default)]
    pub scores: BTreeMap<String, Option<f64>>,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub status: MatchStatus,
    #[serde(default)]
    pub ticket_codes: BTreeMap<String, String>,
}

impl Match {
    pub fn score_of(&self, player: &str) -> Option<f64> {
        self.scores.get(player).copied().flatten()
    }

    pub fn seated(&self) -> impl Iterator<Item = &str> {
        self.players.iter().flatten().map(String::as_str)
    }

    pub fn is_seated(&self, player: &str) -> bool {
        self.seated().any(|p| p == player)
    }

    pub fn has_open_slot(&self) -> bool {
        self.players.len() < 2 || self.players.iter().any(Option::is_none)
    }

    /// Puts `player` into the first empty slot, appending if every slot is taken.
    pub fn seat(&mut self, player: &str) {
        match self.players.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => *slot = Some(player.to_string()),
            None => self.players.push(Some(player.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub round_number: u32,
    #[serde(default)]
    pub matches: Vec<Match>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub rounds: Vec<Round>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmissionBody {
    pub user_id: String,
    pub match_id: String,
    pub code: String,
    pub score: f64,
}

#[derive(Debug)]
pub struct ScoreSubmission {
    pub user_id: String,
    pub competition_id: String,
    pub match_id: String,
    pub ticket_code: String,
    pub score: f64,
}

impl ScoreSubmission {
    pub fn new(competition_id: String, body: ScoreSubmissionBody) -> Self {
        ScoreSubmission {
            user_id: body.user_id,
            competition_id,
            match_id: body.match_id,
            ticket_code: body.code,
            score: body.score,
        }
    }
}
