pub mod challenge;
pub mod impact;
pub mod leaderboard;
pub mod message;
pub mod user;

pub use challenge::ChallengeRepository;
pub use impact::ImpactRepository;
pub use leaderboard::LeaderboardRepository;
pub use message::MessageRepository;
pub use user::UserRepository;
