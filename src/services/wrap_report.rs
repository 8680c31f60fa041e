use crate::db::Db;
use crate::error::AppError;
use crate::models::bracket::{Bracket, MatchStatus};
use crate::models::competition::CompetitionStatus;
use crate::models::wrap_report::*;
use crate::services::{bracket, competition, format_timestamp, leaderboard};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use std::collections::BTreeMap;

/// Replays the bracket into per-player statistics.
fn build_report(competition_id: &str, bracket: &Bracket, completed_at: DateTime<Utc>) -> WrapReport {
    let total_rounds = bracket.rounds.len() as i64;
    let mut stats: BTreeMap<String, PlayerStats> = BTreeMap::new();
    let mut matches = Vec::new();
    let mut champion = None;
    let mut completed_matches = 0;

    for round in &bracket.rounds {
        let is_last_round = i64::from(round.round_number) == total_rounds;

        for m in round.matches.iter().filter(|m| !m.match_id.is_empty()) {
            for player in m.seated() {
                let entry = stats.entry(player.to_string()).or_default();
                entry.total_points += m.score_of(player).unwrap_or(0.0);
                match m.winner.as_deref() {
                    Some(winner) if winner == player => entry.wins += 1,
                    Some(_) => entry.losses += 1,
                    None => {}
                }
            }

            if m.status == MatchStatus::Completed {
                completed_matches += 1;
            }
            if is_last_round && champion.is_none() {
                champion = m.winner.clone();
            }

            matches.push(ReportMatch {
                match_id: m.match_id.clone(),
                players: m.players.clone(),
                scores: m.scores.clone(),
                winner: m.winner.clone(),
                status: m.status,
                round_number: round.round_number,
            });
        }
    }

    let total_players = stats.len() as i64;
    let average_points_per_player = if total_players == 0 {
        0.0
    } else {
        stats.values().map(|s| s.total_points).sum::<f64>() / total_players as f64
    };

    WrapReport {
        competition_id: competition_id.to_string(),
        completed_at: format_timestamp(completed_at),
        champion,
        total_matches: matches.len() as i64,
        total_rounds,
        matches,
        stats,
        summary: ReportSummary {
            total_players,
            completed_matches,
            average_points_per_player,
        },
    }
}

/// Builds and stores the wrap report, marks the competition completed and
/// then rolls the stats into the leaderboards.
///
/// Only a missing or corrupt bracket fails the call. Without a competition
/// record (or one without a game) the report is still stored but nothing is
/// aggregated. A leaderboard failure is logged and swallowed: the report and
/// the status change are already committed at that point.
pub fn generate_wrap_report(db: &Db, competition_id: &str) -> Result<WrapReport, AppError> {
    let (report, comp) = db.transaction(|tx| -> Result<_, AppError> {
        let (bracket, _) = bracket::load_bracket(tx, competition_id)?;
        let comp = competition::load_competition(tx, competition_id)?;

        let report = build_report(competition_id, &bracket, Utc::now());
        tx.execute(
            "INSERT INTO wrap_reports (competition_id, data, completed_at) VALUES (?1, ?2, ?3)
             ON CONFLICT (competition_id) DO UPDATE SET
             data = excluded.data, completed_at = excluded.completed_at",
            params![
                competition_id,
                serde_json::to_string(&report)?,
                report.completed_at
            ],
        )?;

        if let Some(comp) = &comp {
            if comp.status == CompetitionStatus::Completed {
                log::debug!("Regenerating report for completed {}", competition_id);
            }
            competition::set_status(tx, competition_id, CompetitionStatus::Completed)?;
        }
        Ok((report, comp))
    })?;

    log::info!(
        "Generated wrap report for {}: {} matches, champion {:?}",
        competition_id,
        report.total_matches,
        report.champion
    );

    let Some(comp) = comp else {
        log::warn!(
            "No competition record for {}, skipping leaderboard update",
            competition_id
        );
        return Ok(report);
    };
    let Some(game_id) = comp.game_id.as_deref() else {
        log::warn!(
            "Competition {} has no game, skipping leaderboard update",
            competition_id
        );
        return Ok(report);
    };

    if let Err(err) =
        leaderboard::update_leaderboards(db, &report, game_id, comp.league_id.as_deref())
    {
        log::error!(
            "Leaderboard update for {} failed, keeping wrap report: {}",
            competition_id,
            err
        );
    }

    Ok(report)
}

pub fn get_wrap_report(db: &Db, competition_id: &str) -> Result<WrapReport, AppError> {
    let data = db.with_conn(|conn| {
        conn.query_row(
            "SELECT data FROM wrap_reports WHERE competition_id = ?1",
            params![competition_id],
            |row| row.get::<_, String>(0),
        )
        .optional()
    })?;

    match data {
        Some(data) => serde_json::from_str(&data).map_err(|e| {
            AppError::DataCorrupt(format!("wrap report for {}: {}", competition_id, e))
        }),
        None => Err(AppError::ReportNotFound(competition_id.to_string())),
    }
}

pub fn has_wrap_report(db: &Db, competition_id: &str) -> Result<bool, AppError> {
    Ok(db.with_conn(|conn| {
        conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM wrap_reports WHERE competition_id = ?1)",
            params![competition_id],
            |row| row.get::<_, bool>(0),
        )
    })?)
}
