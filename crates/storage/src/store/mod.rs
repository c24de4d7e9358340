pub mod memory;
pub mod postgres;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::challenge::CreateChallengeRequest;
use crate::dto::impact::LogImpactRequest;
use crate::dto::message::PostMessageRequest;
use crate::dto::user::SyncUserRequest;
use crate::dto::leaderboard::LeaderboardEntry;
use crate::error::{Result, StorageError};
use crate::models::{Challenge, ChatMessage, ImpactMetric, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Outcome of a per-participant progress update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct ProgressUpdate {
    pub previous_percent: i64,
    pub current_percent: i64,
}

/// Single storage interface over the application's record collections.
///
/// Both backends enforce the same contracts: validation failures reject the
/// call, counters move atomically, `completed_by` stays a subset of
/// `participants`, and the completion rate is recomputed rather than set.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    /// Mirror the resolved identity tuple into the store. Creates the user
    /// with zero points on first sign-in, refreshes the profile afterwards.
    async fn upsert_user(&self, profile: &SyncUserRequest) -> Result<User>;

    /// Atomically add `delta` to the user's point total, returning the new
    /// total. The only way points ever change.
    async fn add_points(&self, user_id: &str, delta: i64) -> Result<i64>;

    async fn add_impact_metric(&self, req: &LogImpactRequest) -> Result<ImpactMetric>;

    /// All of a user's metrics, newest first. A user with no metrics yields
    /// an empty sequence, not an error.
    async fn user_impact_metrics(&self, user_id: &str) -> Result<Vec<ImpactMetric>>;

    async fn create_challenge(&self, req: &CreateChallengeRequest) -> Result<Challenge>;

    async fn get_challenge(&self, challenge_id: Uuid) -> Result<Challenge>;

    /// Challenges whose window has not closed, soonest-ending first.
    async fn active_challenges(&self) -> Result<Vec<Challenge>>;

    /// Challenges the user participates in, most recently started first.
    async fn user_challenges(&self, user_id: &str) -> Result<Vec<Challenge>>;

    async fn join_challenge(&self, challenge_id: Uuid, user_id: &str) -> Result<Challenge>;

    /// Record a participant's own progress percentage, returning where it
    /// moved from and to. Point awards are the caller's concern.
    async fn record_progress(
        &self,
        challenge_id: Uuid,
        user_id: &str,
        percent: i64,
    ) -> Result<ProgressUpdate>;

    /// Mark a participant's completion and fold `impact_value` into the
    /// challenge's aggregate impact.
    async fn complete_challenge(
        &self,
        challenge_id: Uuid,
        user_id: &str,
        impact_value: f64,
    ) -> Result<Challenge>;

    async fn add_message(&self, req: &PostMessageRequest) -> Result<ChatMessage>;

    /// Messages in a channel, timestamp ascending. `None` is the global chat.
    async fn messages(&self, challenge_id: Option<Uuid>, limit: u32) -> Result<Vec<ChatMessage>>;

    /// Top users by points descending, ties broken by user id.
    async fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>>;
}

// Contract checks shared by both backends, so the store rejects bad input
// even when a caller skips DTO validation.

pub(crate) fn check_user_id(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(StorageError::Validation("user id is required".into()));
    }
    Ok(())
}

pub(crate) fn check_metric(req: &LogImpactRequest) -> Result<()> {
    check_user_id(&req.user_id)?;
    if !(req.value > 0.0 && req.value.is_finite()) {
        return Err(StorageError::Validation(
            "metric value must be greater than zero".into(),
        ));
    }
    Ok(())
}

pub(crate) fn check_new_challenge(req: &CreateChallengeRequest) -> Result<()> {
    check_user_id(&req.created_by)?;
    if req.title.trim().is_empty() {
        return Err(StorageError::Validation("challenge title is required".into()));
    }
    if req.points <= 0 {
        return Err(StorageError::Validation(
            "challenge points must be a positive integer".into(),
        ));
    }
    if req.duration_days <= 0 {
        return Err(StorageError::Validation(
            "challenge duration must be a positive number of days".into(),
        ));
    }
    Ok(())
}

pub(crate) fn check_progress_percent(percent: i64) -> Result<()> {
    if !(0..=100).contains(&percent) {
        return Err(StorageError::Validation(
            "progress must be between 0 and 100 percent".into(),
        ));
    }
    Ok(())
}

pub(crate) fn check_message(req: &PostMessageRequest) -> Result<()> {
    check_user_id(&req.user_id)?;
    if req.content.trim().is_empty() {
        return Err(StorageError::Validation(
            "message content must not be empty".into(),
        ));
    }
    Ok(())
}
