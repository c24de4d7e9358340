pub mod assistant;
pub mod challenges;
pub mod community;
pub mod impact;
pub mod leaderboard;
pub mod users;
