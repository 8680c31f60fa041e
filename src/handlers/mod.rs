pub mod leaderboard;
pub mod scoring;
pub mod ticket;
pub mod wrap_report;
