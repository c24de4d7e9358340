pub mod challenge;
pub mod chat_message;
pub mod impact_metric;
pub mod user;

pub use challenge::{Challenge, ChallengeMetrics, ChallengeStatus};
pub use chat_message::ChatMessage;
pub use impact_metric::{Category, ImpactMetric};
pub use user::User;
