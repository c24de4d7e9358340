use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::challenge::CreateChallengeRequest;
use crate::dto::impact::LogImpactRequest;
use crate::dto::leaderboard::LeaderboardEntry;
use crate::dto::message::PostMessageRequest;
use crate::dto::user::SyncUserRequest;
use crate::error::Result;
use crate::models::{Challenge, ChatMessage, ImpactMetric, User};
use crate::repository::{
    ChallengeRepository, ImpactRepository, LeaderboardRepository, MessageRepository,
    UserRepository,
};

use super::{
    check_message, check_metric, check_new_challenge, check_progress_percent, check_user_id,
    ProgressUpdate, Store,
};

/// Postgres-backed store. Thin facade over the per-entity repositories.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl Store for PgStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        check_user_id(user_id)?;
        UserRepository::new(&self.pool).find_by_id(user_id).await
    }

    async fn upsert_user(&self, profile: &SyncUserRequest) -> Result<User> {
        check_user_id(&profile.id)?;
        UserRepository::new(&self.pool).upsert(profile).await
    }

    async fn add_points(&self, user_id: &str, delta: i64) -> Result<i64> {
        check_user_id(user_id)?;
        UserRepository::new(&self.pool)
            .add_points(user_id, delta)
            .await
    }

    async fn add_impact_metric(&self, req: &LogImpactRequest) -> Result<ImpactMetric> {
        check_metric(req)?;
        ImpactRepository::new(&self.pool).insert(req).await
    }

    async fn user_impact_metrics(&self, user_id: &str) -> Result<Vec<ImpactMetric>> {
        check_user_id(user_id)?;
        ImpactRepository::new(&self.pool).list_for_user(user_id).await
    }

    async fn create_challenge(&self, req: &CreateChallengeRequest) -> Result<Challenge> {
        check_new_challenge(req)?;
        ChallengeRepository::new(&self.pool).create(req).await
    }

    async fn get_challenge(&self, challenge_id: Uuid) -> Result<Challenge> {
        ChallengeRepository::new(&self.pool)
            .find_by_id(challenge_id)
            .await
    }

    async fn active_challenges(&self) -> Result<Vec<Challenge>> {
        ChallengeRepository::new(&self.pool).list_active().await
    }

    async fn user_challenges(&self, user_id: &str) -> Result<Vec<Challenge>> {
        check_user_id(user_id)?;
        ChallengeRepository::new(&self.pool)
            .list_for_user(user_id)
            .await
    }

    async fn join_challenge(&self, challenge_id: Uuid, user_id: &str) -> Result<Challenge> {
        check_user_id(user_id)?;
        ChallengeRepository::new(&self.pool)
            .join(challenge_id, user_id)
            .await
    }

    async fn record_progress(
        &self,
        challenge_id: Uuid,
        user_id: &str,
        percent: i64,
    ) -> Result<ProgressUpdate> {
        check_user_id(user_id)?;
        check_progress_percent(percent)?;
        ChallengeRepository::new(&self.pool)
            .record_progress(challenge_id, user_id, percent)
            .await
    }

    async fn complete_challenge(
        &self,
        challenge_id: Uuid,
        user_id: &str,
        impact_value: f64,
    ) -> Result<Challenge> {
        check_user_id(user_id)?;
        ChallengeRepository::new(&self.pool)
            .complete(challenge_id, user_id, impact_value)
            .await
    }

    async fn add_message(&self, req: &PostMessageRequest) -> Result<ChatMessage> {
        check_message(req)?;
        MessageRepository::new(&self.pool).insert(req).await
    }

    async fn messages(&self, challenge_id: Option<Uuid>, limit: u32) -> Result<Vec<ChatMessage>> {
        MessageRepository::new(&self.pool)
            .list_channel(challenge_id, limit)
            .await
    }

    async fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>> {
        LeaderboardRepository::new(&self.pool).top(limit).await
    }
}
