use crate::db::Db;
use crate::error::AppError;
use crate::models::ticket::*;
use crate::services::{format_timestamp, parse_timestamp};
use crate::validation;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

const CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const CODE_LEN: usize = 10;

// Uniqueness is not checked. 36^10 codes keeps collisions negligible at our volume.
fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

pub fn issue_ticket(db: &Db, req: IssueTicketRequest) -> Result<IssueTicketResult, AppError> {
    validation::validate_id("userId", &req.user_id)?;
    validation::validate_id("competitionId", &req.competition_id)?;
    validation::validate_id("roundId", &req.round_id)?;
    validation::validate_ttl_minutes(req.ttl_minutes)?;

    let id = Uuid::new_v4().to_string();
    let code = generate_code();
    let now = Utc::now();
    let issued_at = format_timestamp(now);
    let expires_at = format_timestamp(now + Duration::minutes(req.ttl_minutes));

    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO tickets (id, code, user_id, competition_id, round_id, valid, issued_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?7)",
            params![
                id,
                code,
                req.user_id,
                req.competition_id,
                req.round_id,
                issued_at,
                expires_at,
            ],
        )
    })?;

    log::info!(
        "Issued ticket {} to {} for {}/{} (expires {})",
        id,
        req.user_id,
        req.competition_id,
        req.round_id,
        expires_at
    );

    Ok(IssueTicketResult { id, code })
}

fn find_ticket(
    conn: &Connection,
    code: &str,
    competition_id: &str,
) -> Result<Option<Ticket>, rusqlite::Error> {
    conn.query_row(
        "SELECT id, code, user_id, competition_id, round_id, valid, issued_at, expires_at
         FROM tickets WHERE code = ?1 AND competition_id = ?2
         ORDER BY issued_at DESC LIMIT 1",
        params![code, competition_id],
        |row| {
            Ok(Ticket {
                id: row.get(0)?,
                code: row.get(1)?,
                user_id: row.get(2)?,
                competition_id: row.get(3)?,
                round_id: row.get(4)?,
                valid: row.get::<_, i64>(5)? != 0,
                issued_at: row.get(6)?,
                expires_at: row.get(7)?,
            })
        },
    )
    .optional()
}

fn is_usable_at(ticket: &Ticket, now: DateTime<Utc>) -> bool {
    if !ticket.valid {
        return false;
    }
    match parse_timestamp(&ticket.expires_at) {
        Some(expires_at) => expires_at >= now,
        None => {
            log::warn!(
                "Ticket {} has unparsable expiry {:?}",
                ticket.id,
                ticket.expires_at
            );
            false
        }
    }
}

/// Ticket check usable from inside a larger transaction.
pub fn check_ticket(
    conn: &Connection,
    code: &str,
    competition_id: &str,
    now: DateTime<Utc>,
) -> Result<bool, rusqlite::Error> {
    let code = validation::normalize_code(code);
    let usable = match find_ticket(conn, &code, competition_id)? {
        Some(ticket) => is_usable_at(&ticket, now),
        None => false,
    };
    if !usable {
        log::debug!("Ticket {} rejected for competition {}", code, competition_id);
    }
    Ok(usable)
}

pub fn validate_ticket(db: &Db, code: &str, competition_id: &str) -> Result<bool, AppError> {
    validate_ticket_at(db, code, competition_id, Utc::now())
}

pub fn validate_ticket_at(
    db: &Db,
    code: &str,
    competition_id: &str,
    now: DateTime<Utc>,
) -> Result<bool, AppError> {
    Ok(db.with_conn(|conn| check_ticket(conn, code, competition_id, now))?)
}

/// Marks every ticket with this code in the competition as invalid. Returns
/// whether any ticket existed.
pub fn revoke_ticket(db: &Db, code: &str, competition_id: &str) -> Result<bool, AppError> {
    let code = validation::normalize_code(code);
    let changed = db.with_conn(|conn| {
        conn.execute(
            "UPDATE tickets SET valid = 0 WHERE code = ?1 AND competition_id = ?2",
            params![code, competition_id],
        )
    })?;

    if changed > 0 {
        log::info!("Revoked ticket {} for competition {}", code, competition_id);
    }
    Ok(changed > 0)
}
