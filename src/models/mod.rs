pub mod bracket;
pub mod competition;
pub mod leaderboard;
pub mod ticket;
pub mod wrap_report;
