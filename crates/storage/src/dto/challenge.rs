use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Category, Challenge, ChallengeMetrics, ChallengeStatus};

/// Request payload for creating a new challenge
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateChallengeRequest {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    #[validate(length(max = 2000))]
    #[serde(default)]
    pub description: String,

    pub category: Category,

    #[validate(range(min = 1, message = "Points must be a positive integer"))]
    pub points: i64,

    #[validate(range(min = 1, max = 365, message = "Duration must be between 1 and 365 days"))]
    pub duration_days: i64,

    #[validate(length(min = 1, max = 255, message = "Creator id is required"))]
    pub created_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct JoinChallengeRequest {
    #[validate(length(min = 1, max = 255, message = "User id is required"))]
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ChallengeProgressRequest {
    #[validate(length(min = 1, max = 255, message = "User id is required"))]
    pub user_id: String,

    #[validate(range(min = 0, max = 100, message = "Progress must be between 0 and 100 percent"))]
    pub progress_percent: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CompleteChallengeRequest {
    #[validate(length(min = 1, max = 255, message = "User id is required"))]
    pub user_id: String,

    /// Impact magnitude the completion contributed, added to the challenge's
    /// aggregate total.
    #[validate(range(exclusive_min = 0.0, message = "Impact value must be greater than zero"))]
    pub impact_value: f64,
}

/// Challenge as served to clients, with the derived status attached.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChallengeResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub points: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_by: String,
    pub status: ChallengeStatus,
    pub participants: Vec<String>,
    pub completed_by: Vec<String>,
    pub metrics: ChallengeMetrics,
}

impl From<Challenge> for ChallengeResponse {
    fn from(challenge: Challenge) -> Self {
        let status = challenge.status_at(Utc::now());
        Self {
            id: challenge.id,
            title: challenge.title,
            description: challenge.description,
            category: challenge.category,
            points: challenge.points,
            start_date: challenge.start_date,
            end_date: challenge.end_date,
            created_by: challenge.created_by,
            status,
            participants: challenge.participants,
            completed_by: challenge.completed_by,
            metrics: challenge.metrics,
        }
    }
}

/// Response after a progress update: the percent moved from/to and any bonus
/// points crossing 20% steps earned.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProgressResponse {
    pub challenge_id: Uuid,
    pub user_id: String,
    pub previous_percent: i64,
    pub current_percent: i64,
    pub points_awarded: i64,
}

/// Response after completing a challenge.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompletionResponse {
    pub challenge: ChallengeResponse,
    pub points_awarded: i64,
}
