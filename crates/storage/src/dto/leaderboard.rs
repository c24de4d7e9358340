use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::User;

/// A read-only ranking projection over users, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardEntry {
    pub id: String,
    pub name: String,
    pub image: String,
    pub points: i64,
    pub badges: Vec<String>,
    pub sustainability_score: f64,
}

impl From<User> for LeaderboardEntry {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            image: user.image,
            points: user.points,
            badges: user.badges,
            sustainability_score: user.sustainability_score,
        }
    }
}
