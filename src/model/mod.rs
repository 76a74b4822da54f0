pub mod dataset;
pub mod leaderboard;
pub mod question;
