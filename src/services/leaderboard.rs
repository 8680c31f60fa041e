use crate::db::Db;
use crate::error::AppError;
use crate::models::leaderboard::{LeaderboardEntry, GLOBAL_SCOPE};
use crate::models::wrap_report::{PlayerStats, WrapReport};
use crate::services::format_timestamp;
use crate::validation;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

const ENTRY_COLUMNS: &str =
    "scope, player_id, wins, losses, total_points, titles, games_played, last_updated";

fn entry_from_row(row: &Row<'_>) -> Result<LeaderboardEntry, rusqlite::Error> {
    Ok(LeaderboardEntry {
        scope: row.get(0)?,
        player_id: row.get(1)?,
        wins: row.get(2)?,
        losses: row.get(3)?,
        total_points: row.get(4)?,
        titles: row.get(5)?,
        games_played: row.get(6)?,
        last_updated: row.get(7)?,
    })
}

fn read_entry(
    conn: &Connection,
    scope: &str,
    player_id: &str,
) -> Result<Option<LeaderboardEntry>, rusqlite::Error> {
    conn.query_row(
        &format!(
            "SELECT {} FROM leaderboard_entries WHERE scope = ?1 AND player_id = ?2",
            ENTRY_COLUMNS
        ),
        params![scope, player_id],
        entry_from_row,
    )
    .optional()
}

fn merge_entry(
    conn: &Connection,
    scope: &str,
    player_id: &str,
    stats: &PlayerStats,
    champion: bool,
    now: &str,
) -> Result<(), AppError> {
    let current = read_entry(conn, scope, player_id)?;
    let (wins, losses, total_points, titles, games_played) = match current {
        Some(e) => (e.wins, e.losses, e.total_points, e.titles, e.games_played),
        None => (0, 0, 0.0, 0, 0),
    };

    conn.execute(
        "INSERT INTO leaderboard_entries
         (scope, player_id, wins, losses, total_points, titles, games_played, last_updated)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT (scope, player_id) DO UPDATE SET
         wins = excluded.wins, losses = excluded.losses, total_points = excluded.total_points,
         titles = excluded.titles, games_played = excluded.games_played,
         last_updated = excluded.last_updated",
        params![
            scope,
            player_id,
            wins + stats.wins,
            losses + stats.losses,
            total_points + stats.total_points,
            titles + i64::from(champion),
            games_played + stats.wins + stats.losses,
            now,
        ],
    )?;
    Ok(())
}

/// Folds a wrap report into the global, game and (optional) league scopes.
///
/// Each player/scope pair is its own read-modify-write transaction. Nothing
/// records which reports were applied already: calling this twice with the
/// same report counts it twice.
pub fn update_leaderboards(
    db: &Db,
    report: &WrapReport,
    game_id: &str,
    league_id: Option<&str>,
) -> Result<(), AppError> {
    validation::validate_id("gameId", game_id)?;

    let mut scopes = vec![GLOBAL_SCOPE, game_id];
    scopes.extend(league_id);

    let now = format_timestamp(Utc::now());

    for scope in &scopes {
        for (player_id, stats) in &report.stats {
            let champion = report.champion.as_deref() == Some(player_id.as_str());
            db.transaction(|tx| merge_entry(tx, scope, player_id, stats, champion, &now))
                .map_err(|e| {
                    AppError::AggregationFailure(format!("{}/{}: {}", scope, player_id, e))
                })?;
        }
    }

    log::info!(
        "Applied report for {} to scopes {:?} ({} players)",
        report.competition_id,
        scopes,
        report.stats.len()
    );
    Ok(())
}

pub fn get_leaderboard(db: &Db, scope: &str, limit: i64) -> Result<Vec<LeaderboardEntry>, AppError> {
    let limit = limit.clamp(1, 100);

    Ok(db.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM leaderboard_entries WHERE scope = ?1
             ORDER BY wins DESC, total_points DESC, player_id ASC LIMIT ?2",
            ENTRY_COLUMNS
        ))?;
        let rows = stmt.query_map(params![scope, limit], entry_from_row)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    })?)
}

pub fn get_leaderboard_entry(
    db: &Db,
    scope: &str,
    player_id: &str,
) -> Result<Option<LeaderboardEntry>, AppError> {
    Ok(db.with_conn(|conn| read_entry(conn, scope, player_id))?)
}
