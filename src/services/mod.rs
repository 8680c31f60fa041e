pub mod bracket;
pub mod competition;
pub mod leaderboard;
pub mod scoring;
pub mod ticket;
pub mod wrap_report;

#[cfg(test)]
pub mod fixtures;

use chrono::{DateTime, NaiveDateTime, Utc};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Fixed-width UTC timestamps, so stored values also sort chronologically.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .ok()
        .map(|t| t.and_utc())
}
