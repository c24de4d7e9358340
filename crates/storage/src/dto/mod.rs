pub mod challenge;
pub mod common;
pub mod impact;
pub mod leaderboard;
pub mod message;
pub mod user;
