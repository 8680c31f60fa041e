//! Seeding helpers for tests. Competitions and brackets are created by
//! another part of the platform, so the service itself never writes them
//! from scratch.

use crate::db::Db;
use crate::models::bracket::{Bracket, Match, MatchStatus, Round};
use crate::models::ticket::IssueTicketRequest;
use crate::services::ticket;
use rusqlite::params;
use std::collections::BTreeMap;

pub fn put_raw_bracket(db: &Db, competition_id: &str, data: &str) {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT OR REPLACE INTO brackets (competition_id, data, version) VALUES (?1, ?2, 0)",
            params![competition_id, data],
        )
    })
    .unwrap();
}

pub fn put_bracket(db: &Db, competition_id: &str, bracket: &Bracket) {
    put_raw_bracket(db, competition_id, &serde_json::to_string(bracket).unwrap());
}

pub fn put_competition(
    db: &Db,
    competition_id: &str,
    game_id: Option<&str>,
    league_id: Option<&str>,
) {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT OR REPLACE INTO competitions (id, status, game_id, league_id)
             VALUES (?1, 'active', ?2, ?3)",
            params![competition_id, game_id, league_id],
        )
    })
    .unwrap();
}

pub fn pending_match(match_id: &str, players: &[Option<&str>]) -> Match {
    Match {
        match_id: match_id.into(),
        players: players.iter().map(|p| p.map(String::from)).collect(),
        scores: BTreeMap::new(),
        winner: None,
        status: MatchStatus::Pending,
        ticket_codes: BTreeMap::new(),
    }
}

/// Four players, two semi-finals feeding an empty final.
pub fn two_round_bracket() -> Bracket {
    Bracket {
        rounds: vec![
            Round {
                round_number: 1,
                matches: vec![
                    pending_match("R1M1", &[Some("user1"), Some("user2")]),
                    pending_match("R1M2", &[Some("user3"), Some("user4")]),
                ],
            },
            Round {
                round_number: 2,
                matches: vec![pending_match("R2M1", &[])],
            },
        ],
    }
}

/// Seeds a competition with the two round bracket.
pub fn seed_competition(db: &Db, competition_id: &str, game_id: &str, league_id: Option<&str>) {
    put_competition(db, competition_id, Some(game_id), league_id);
    put_bracket(db, competition_id, &two_round_bracket());
}

pub fn ticket_code(db: &Db, user_id: &str, competition_id: &str) -> String {
    ticket::issue_ticket(
        db,
        IssueTicketRequest {
            user_id: user_id.into(),
            competition_id: competition_id.into(),
            round_id: "R1".into(),
            ttl_minutes: 5,
        },
    )
    .unwrap()
    .code
}
