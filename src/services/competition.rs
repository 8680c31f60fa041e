use crate::error::AppError;
use crate::models::competition::{Competition, CompetitionStatus};
use rusqlite::{params, Connection, OptionalExtension};

/// Competition records are owned elsewhere; a missing one is not an error here.
pub fn load_competition(
    conn: &Connection,
    competition_id: &str,
) -> Result<Option<Competition>, AppError> {
    let row = conn
        .query_row(
            "SELECT status, game_id, league_id FROM competitions WHERE id = ?1",
            params![competition_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            },
        )
        .optional()?;

    let Some((status, game_id, league_id)) = row else {
        return Ok(None);
    };

    let status = CompetitionStatus::parse(&status).ok_or_else(|| {
        AppError::DataCorrupt(format!(
            "competition {} has unknown status {:?}",
            competition_id, status
        ))
    })?;

    Ok(Some(Competition {
        status,
        game_id,
        league_id,
    }))
}

pub fn set_status(
    conn: &Connection,
    competition_id: &str,
    status: CompetitionStatus,
) -> Result<(), AppError> {
    let changed = conn.execute(
        "UPDATE competitions SET status = ?1 WHERE id = ?2",
        params![status.as_str(), competition_id],
    )?;
    if changed == 0 {
        return Err(AppError::CompetitionNotFound(competition_id.to_string()));
    }
    Ok(())
}
