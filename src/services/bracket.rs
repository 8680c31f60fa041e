use crate::error::AppError;
use crate::models::bracket::{Bracket, Match};
use crate::services::format_timestamp;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

/// Loads the bracket together with its version token.
pub fn load_bracket(conn: &Connection, competition_id: &str) -> Result<(Bracket, i64), AppError> {
    let row = conn
        .query_row(
            "SELECT data, version FROM brackets WHERE competition_id = ?1",
            params![competition_id],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
        )
        .optional()?;

    let (data, version) =
        row.ok_or_else(|| AppError::BracketNotFound(competition_id.to_string()))?;

    let mut bracket: Bracket = serde_json::from_str(&data).map_err(|e| {
        AppError::DataCorrupt(format!("bracket for {} does not parse: {}", competition_id, e))
    })?;

    if bracket.rounds.is_empty() {
        return Err(AppError::DataCorrupt(format!(
            "bracket for {} has no rounds",
            competition_id
        )));
    }

    bracket.rounds.sort_by_key(|round| round.round_number);
    Ok((bracket, version))
}

/// Writes the whole bracket back if nobody else wrote it since it was
/// loaded at `expected_version`.
pub fn save_bracket(
    conn: &Connection,
    competition_id: &str,
    bracket: &Bracket,
    expected_version: i64,
) -> Result<i64, AppError> {
    let data = serde_json::to_string(bracket)?;
    let changed = conn.execute(
        "UPDATE brackets SET data = ?1, version = version + 1, updated_at = ?2
         WHERE competition_id = ?3 AND version = ?4",
        params![
            data,
            format_timestamp(Utc::now()),
            competition_id,
            expected_version
        ],
    )?;

    if changed == 0 {
        log::warn!(
            "Bracket for {} changed since version {}",
            competition_id,
            expected_version
        );
        return Err(AppError::Conflict(format!(
            "bracket for {} is no longer at version {}",
            competition_id, expected_version
        )));
    }
    Ok(expected_version + 1)
}

/// Linear scan; brackets hold at most a few hundred matches.
pub fn find_match_mut<'a>(
    bracket: &'a mut Bracket,
    match_id: &str,
) -> Option<(usize, &'a mut Match)> {
    bracket
        .rounds
        .iter_mut()
        .enumerate()
        .find_map(|(index, round)| {
            round
                .matches
                .iter_mut()
                .find(|m| m.match_id == match_id)
                .map(|m| (index, m))
        })
}
