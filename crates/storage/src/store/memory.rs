use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::dto::challenge::CreateChallengeRequest;
use crate::dto::impact::LogImpactRequest;
use crate::dto::leaderboard::LeaderboardEntry;
use crate::dto::message::PostMessageRequest;
use crate::dto::user::SyncUserRequest;
use crate::error::{Result, StorageError};
use crate::models::{Challenge, ChallengeMetrics, ChatMessage, ImpactMetric, User};

use super::{
    check_message, check_metric, check_new_challenge, check_progress_percent, check_user_id,
    ProgressUpdate, Store,
};

#[derive(Debug, Clone)]
struct ParticipantState {
    user_id: String,
    progress_percent: i64,
    completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
struct ChallengeState {
    id: Uuid,
    title: String,
    description: String,
    category: crate::models::Category,
    points: i64,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    created_by: String,
    total_impact: f64,
    created_at: DateTime<Utc>,
    participants: Vec<ParticipantState>,
}

impl ChallengeState {
    fn assemble(&self) -> Challenge {
        let participants: Vec<String> = self
            .participants
            .iter()
            .map(|p| p.user_id.clone())
            .collect();
        let completed_by: Vec<String> = self
            .participants
            .iter()
            .filter(|p| p.completed_at.is_some())
            .map(|p| p.user_id.clone())
            .collect();
        let metrics = ChallengeMetrics::recompute(
            participants.len() as i64,
            completed_by.len() as i64,
            self.total_impact,
        );

        Challenge {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category,
            points: self.points,
            start_date: self.start_date,
            end_date: self.end_date,
            created_by: self.created_by.clone(),
            participants,
            completed_by,
            metrics,
            created_at: self.created_at,
        }
    }

    fn participant_mut(&mut self, user_id: &str) -> Option<&mut ParticipantState> {
        self.participants.iter_mut().find(|p| p.user_id == user_id)
    }
}

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<String, User>,
    metrics: Vec<ImpactMetric>,
    challenges: HashMap<Uuid, ChallengeState>,
    messages: Vec<ChatMessage>,
}

/// In-memory store with its own lifecycle: construct one per process or per
/// test run, drop it when done. Replaces any notion of process-wide mock
/// state.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        check_user_id(user_id)?;
        let inner = self.inner.read().expect("lock poisoned");
        Ok(inner.users.get(user_id).cloned())
    }

    async fn upsert_user(&self, profile: &SyncUserRequest) -> Result<User> {
        check_user_id(&profile.id)?;
        let mut inner = self.inner.write().expect("lock poisoned");
        let now = Utc::now();

        let user = inner
            .users
            .entry(profile.id.clone())
            .and_modify(|u| {
                u.name = profile.name.clone();
                u.email = profile.email.clone();
                u.image = profile.image.clone();
                u.updated_at = now;
            })
            .or_insert_with(|| User {
                id: profile.id.clone(),
                name: profile.name.clone(),
                email: profile.email.clone(),
                image: profile.image.clone(),
                points: 0,
                badges: Vec::new(),
                sustainability_score: 0.0,
                created_at: now,
                updated_at: now,
            });

        Ok(user.clone())
    }

    async fn add_points(&self, user_id: &str, delta: i64) -> Result<i64> {
        check_user_id(user_id)?;
        let mut inner = self.inner.write().expect("lock poisoned");
        let user = inner.users.get_mut(user_id).ok_or(StorageError::NotFound)?;
        user.points = (user.points + delta).max(0);
        user.updated_at = Utc::now();
        Ok(user.points)
    }

    async fn add_impact_metric(&self, req: &LogImpactRequest) -> Result<ImpactMetric> {
        check_metric(req)?;
        let mut inner = self.inner.write().expect("lock poisoned");
        if !inner.users.contains_key(&req.user_id) {
            return Err(StorageError::NotFound);
        }

        let metric = ImpactMetric {
            id: Uuid::new_v4(),
            user_id: req.user_id.clone(),
            category: req.category,
            value: req.value,
            description: req.description.clone(),
            logged_at: Utc::now(),
        };
        inner.metrics.push(metric.clone());
        Ok(metric)
    }

    async fn user_impact_metrics(&self, user_id: &str) -> Result<Vec<ImpactMetric>> {
        check_user_id(user_id)?;
        let inner = self.inner.read().expect("lock poisoned");
        let mut metrics: Vec<ImpactMetric> = inner
            .metrics
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        metrics.sort_by(|a, b| b.logged_at.cmp(&a.logged_at));
        Ok(metrics)
    }

    async fn create_challenge(&self, req: &CreateChallengeRequest) -> Result<Challenge> {
        check_new_challenge(req)?;
        let mut inner = self.inner.write().expect("lock poisoned");
        let now = Utc::now();

        let state = ChallengeState {
            id: Uuid::new_v4(),
            title: req.title.clone(),
            description: req.description.clone(),
            category: req.category,
            points: req.points,
            start_date: now,
            end_date: now + Duration::days(req.duration_days),
            created_by: req.created_by.clone(),
            total_impact: 0.0,
            created_at: now,
            participants: Vec::new(),
        };
        let challenge = state.assemble();
        inner.challenges.insert(state.id, state);
        Ok(challenge)
    }

    async fn get_challenge(&self, challenge_id: Uuid) -> Result<Challenge> {
        let inner = self.inner.read().expect("lock poisoned");
        inner
            .challenges
            .get(&challenge_id)
            .map(ChallengeState::assemble)
            .ok_or(StorageError::NotFound)
    }

    async fn active_challenges(&self) -> Result<Vec<Challenge>> {
        let inner = self.inner.read().expect("lock poisoned");
        let now = Utc::now();
        let mut challenges: Vec<Challenge> = inner
            .challenges
            .values()
            .filter(|c| c.end_date > now)
            .map(ChallengeState::assemble)
            .collect();
        challenges.sort_by(|a, b| a.end_date.cmp(&b.end_date));
        Ok(challenges)
    }

    async fn user_challenges(&self, user_id: &str) -> Result<Vec<Challenge>> {
        check_user_id(user_id)?;
        let inner = self.inner.read().expect("lock poisoned");
        let mut challenges: Vec<Challenge> = inner
            .challenges
            .values()
            .filter(|c| c.participants.iter().any(|p| p.user_id == user_id))
            .map(ChallengeState::assemble)
            .collect();
        challenges.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(challenges)
    }

    async fn join_challenge(&self, challenge_id: Uuid, user_id: &str) -> Result<Challenge> {
        check_user_id(user_id)?;
        let mut inner = self.inner.write().expect("lock poisoned");
        if !inner.users.contains_key(user_id) {
            return Err(StorageError::NotFound);
        }
        let state = inner
            .challenges
            .get_mut(&challenge_id)
            .ok_or(StorageError::NotFound)?;

        if state.participants.iter().any(|p| p.user_id == user_id) {
            return Err(StorageError::Conflict(
                "Already joined this challenge".into(),
            ));
        }

        state.participants.push(ParticipantState {
            user_id: user_id.to_string(),
            progress_percent: 0,
            completed_at: None,
        });
        Ok(state.assemble())
    }

    async fn record_progress(
        &self,
        challenge_id: Uuid,
        user_id: &str,
        percent: i64,
    ) -> Result<ProgressUpdate> {
        check_user_id(user_id)?;
        check_progress_percent(percent)?;
        let mut inner = self.inner.write().expect("lock poisoned");
        let state = inner
            .challenges
            .get_mut(&challenge_id)
            .ok_or(StorageError::NotFound)?;
        let participant = state.participant_mut(user_id).ok_or_else(|| {
            StorageError::Conflict("Not a participant in this challenge".into())
        })?;

        let previous = participant.progress_percent;
        participant.progress_percent = percent;
        Ok(ProgressUpdate {
            previous_percent: previous,
            current_percent: percent,
        })
    }

    async fn complete_challenge(
        &self,
        challenge_id: Uuid,
        user_id: &str,
        impact_value: f64,
    ) -> Result<Challenge> {
        check_user_id(user_id)?;
        let mut inner = self.inner.write().expect("lock poisoned");
        let state = inner
            .challenges
            .get_mut(&challenge_id)
            .ok_or(StorageError::NotFound)?;
        let participant = state.participant_mut(user_id).ok_or_else(|| {
            StorageError::Conflict("Not a participant in this challenge".into())
        })?;

        if participant.completed_at.is_some() {
            return Err(StorageError::Conflict(
                "Already completed this challenge".into(),
            ));
        }

        participant.completed_at = Some(Utc::now());
        participant.progress_percent = 100;
        state.total_impact += impact_value;
        Ok(state.assemble())
    }

    async fn add_message(&self, req: &PostMessageRequest) -> Result<ChatMessage> {
        check_message(req)?;
        let mut inner = self.inner.write().expect("lock poisoned");
        if let Some(challenge_id) = req.challenge_id
            && !inner.challenges.contains_key(&challenge_id)
        {
            return Err(StorageError::NotFound);
        }

        let message = ChatMessage {
            id: Uuid::new_v4(),
            content: req.content.clone(),
            user_id: req.user_id.clone(),
            user_name: req.user_name.clone(),
            user_image: req.user_image.clone(),
            challenge_id: req.challenge_id,
            sent_at: Utc::now(),
        };
        inner.messages.push(message.clone());
        Ok(message)
    }

    async fn messages(&self, challenge_id: Option<Uuid>, limit: u32) -> Result<Vec<ChatMessage>> {
        let inner = self.inner.read().expect("lock poisoned");
        let mut messages: Vec<ChatMessage> = inner
            .messages
            .iter()
            .filter(|m| m.challenge_id == challenge_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.sent_at.cmp(&b.sent_at));
        messages.truncate(limit as usize);
        Ok(messages)
    }

    async fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>> {
        let inner = self.inner.read().expect("lock poisoned");
        let mut users: Vec<&User> = inner.users.values().collect();
        users.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.id.cmp(&b.id)));
        Ok(users
            .into_iter()
            .take(limit as usize)
            .cloned()
            .map(LeaderboardEntry::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn profile(id: &str, name: &str) -> SyncUserRequest {
        SyncUserRequest {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{id}@example.com"),
            image: String::new(),
        }
    }

    fn metric(user_id: &str, category: Category, value: f64) -> LogImpactRequest {
        LogImpactRequest {
            user_id: user_id.to_string(),
            category,
            value,
            description: None,
        }
    }

    fn challenge(created_by: &str, points: i64, duration_days: i64) -> CreateChallengeRequest {
        CreateChallengeRequest {
            title: "Water Conservation Challenge".into(),
            description: "Reduce your water usage by 20% this week".into(),
            category: Category::Water,
            points,
            duration_days,
            created_by: created_by.to_string(),
        }
    }

    #[tokio::test]
    async fn metric_roundtrip_adds_exactly_one_record() {
        let store = MemoryStore::new();
        store.upsert_user(&profile("u1", "Demo")).await.unwrap();

        let before = store.user_impact_metrics("u1").await.unwrap().len();
        store
            .add_impact_metric(&metric("u1", Category::Water, 50.0))
            .await
            .unwrap();
        let after = store.user_impact_metrics("u1").await.unwrap();

        assert_eq!(after.len(), before + 1);
        assert_eq!(after[0].category, Category::Water);
        assert_eq!(after[0].value, 50.0);
    }

    #[tokio::test]
    async fn metric_rejects_non_positive_value_and_missing_user() {
        let store = MemoryStore::new();
        store.upsert_user(&profile("u1", "Demo")).await.unwrap();

        let err = store
            .add_impact_metric(&metric("u1", Category::Waste, 0.0))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));

        let err = store
            .add_impact_metric(&metric("", Category::Waste, 1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));

        let err = store
            .add_impact_metric(&metric("ghost", Category::Waste, 1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn metrics_read_is_idempotent() {
        let store = MemoryStore::new();
        store.upsert_user(&profile("u1", "Demo")).await.unwrap();
        for value in [1.0, 2.0, 3.0] {
            store
                .add_impact_metric(&metric("u1", Category::Energy, value))
                .await
                .unwrap();
        }

        let first = store.user_impact_metrics("u1").await.unwrap();
        let second = store.user_impact_metrics("u1").await.unwrap();
        let ids: Vec<_> = first.iter().map(|m| m.id).collect();
        let ids_again: Vec<_> = second.iter().map(|m| m.id).collect();
        assert_eq!(ids, ids_again);
    }

    #[tokio::test]
    async fn join_increments_participants_and_rejects_duplicates() {
        let store = MemoryStore::new();
        store.upsert_user(&profile("u1", "Demo")).await.unwrap();
        let created = store.create_challenge(&challenge("admin", 100, 7)).await.unwrap();
        assert_eq!(created.metrics.total_participants, 0);

        let joined = store.join_challenge(created.id, "u1").await.unwrap();
        assert!(joined.participants.contains(&"u1".to_string()));
        assert_eq!(joined.metrics.total_participants, 1);

        let err = store.join_challenge(created.id, "u1").await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));

        let unchanged = store.get_challenge(created.id).await.unwrap();
        assert_eq!(unchanged.metrics.total_participants, 1);
    }

    #[tokio::test]
    async fn join_requires_synced_user() {
        let store = MemoryStore::new();
        let created = store.create_challenge(&challenge("admin", 100, 7)).await.unwrap();

        let err = store.join_challenge(created.id, "ghost").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));

        let unchanged = store.get_challenge(created.id).await.unwrap();
        assert_eq!(unchanged.metrics.total_participants, 0);
        assert!(unchanged.participants.is_empty());
    }

    #[tokio::test]
    async fn join_missing_challenge_is_not_found() {
        let store = MemoryStore::new();
        store.upsert_user(&profile("u1", "Demo")).await.unwrap();
        let err = store
            .join_challenge(Uuid::new_v4(), "u1")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn completion_keeps_completed_subset_and_exact_rate() {
        let store = MemoryStore::new();
        let created = store.create_challenge(&challenge("admin", 100, 7)).await.unwrap();
        for user in ["u1", "u2", "u3", "u4"] {
            store.upsert_user(&profile(user, user)).await.unwrap();
            store.join_challenge(created.id, user).await.unwrap();
        }

        let after = store.complete_challenge(created.id, "u1", 12.5).await.unwrap();
        assert!(after
            .completed_by
            .iter()
            .all(|u| after.participants.contains(u)));
        assert_eq!(after.metrics.completion_rate, 0.25);
        assert_eq!(after.metrics.total_impact, 12.5);

        // Not a participant
        let err = store
            .complete_challenge(created.id, "outsider", 1.0)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));

        // Already completed
        let err = store
            .complete_challenge(created.id, "u1", 1.0)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));

        let second = store.complete_challenge(created.id, "u2", 7.5).await.unwrap();
        assert_eq!(second.metrics.completion_rate, 0.5);
        assert_eq!(second.metrics.total_impact, 20.0);
    }

    #[tokio::test]
    async fn challenge_window_matches_requested_duration() {
        let store = MemoryStore::new();
        let created = store.create_challenge(&challenge("admin", 100, 7)).await.unwrap();
        let window = created.end_date - created.start_date;
        let skew = (window - Duration::days(7)).num_seconds().abs();
        assert!(skew <= 1, "window off by {skew}s");
    }

    #[tokio::test]
    async fn create_challenge_rejects_bad_points_and_duration() {
        let store = MemoryStore::new();
        let err = store
            .create_challenge(&challenge("admin", 0, 7))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));

        let err = store
            .create_challenge(&challenge("admin", 100, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));
    }

    #[tokio::test]
    async fn progress_requires_participation() {
        let store = MemoryStore::new();
        store.upsert_user(&profile("u1", "Demo")).await.unwrap();
        let created = store.create_challenge(&challenge("admin", 100, 7)).await.unwrap();

        let err = store
            .record_progress(created.id, "u1", 20)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));

        store.join_challenge(created.id, "u1").await.unwrap();
        let update = store.record_progress(created.id, "u1", 40).await.unwrap();
        assert_eq!(update.previous_percent, 0);
        assert_eq!(update.current_percent, 40);

        let update = store.record_progress(created.id, "u1", 60).await.unwrap();
        assert_eq!(update.previous_percent, 40);
    }

    #[tokio::test]
    async fn leaderboard_sorted_and_bounded() {
        let store = MemoryStore::new();
        for (id, points) in [("a", 30), ("b", 120), ("c", 70), ("d", 70)] {
            store.upsert_user(&profile(id, id)).await.unwrap();
            if points > 0 {
                store.add_points(id, points).await.unwrap();
            }
        }

        let top = store.leaderboard(3).await.unwrap();
        assert_eq!(top.len(), 3);
        for pair in top.windows(2) {
            assert!(pair[0].points >= pair[1].points);
        }
        assert_eq!(top[0].id, "b");
        // Ties broken by id, stable across reads.
        assert_eq!(top[1].id, "c");
        assert_eq!(top[2].id, "d");
    }

    #[tokio::test]
    async fn messages_ordered_ascending_per_channel() {
        let store = MemoryStore::new();
        store.upsert_user(&profile("u1", "Demo")).await.unwrap();
        let created = store.create_challenge(&challenge("admin", 100, 7)).await.unwrap();

        for (content, challenge_id) in [
            ("hello", None),
            ("challenge talk", Some(created.id)),
            ("world", None),
        ] {
            store
                .add_message(&PostMessageRequest {
                    content: content.into(),
                    user_id: "u1".into(),
                    user_name: "Demo".into(),
                    user_image: None,
                    challenge_id,
                })
                .await
                .unwrap();
        }

        let global = store.messages(None, 50).await.unwrap();
        assert_eq!(global.len(), 2);
        assert!(global[0].sent_at <= global[1].sent_at);
        assert_eq!(global[0].content, "hello");

        let scoped = store.messages(Some(created.id), 50).await.unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].content, "challenge talk");

        let err = store
            .add_message(&PostMessageRequest {
                content: "   ".into(),
                user_id: "u1".into(),
                user_name: "Demo".into(),
                user_image: None,
                challenge_id: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));
    }

    #[tokio::test]
    async fn active_challenges_sorted_by_end_date() {
        let store = MemoryStore::new();
        store.create_challenge(&challenge("admin", 100, 14)).await.unwrap();
        store.create_challenge(&challenge("admin", 100, 3)).await.unwrap();
        store.create_challenge(&challenge("admin", 100, 30)).await.unwrap();

        let active = store.active_challenges().await.unwrap();
        assert_eq!(active.len(), 3);
        for pair in active.windows(2) {
            assert!(pair[0].end_date <= pair[1].end_date);
        }
    }

    #[tokio::test]
    async fn upsert_preserves_points_on_refresh() {
        let store = MemoryStore::new();
        store.upsert_user(&profile("u1", "Before")).await.unwrap();
        store.add_points("u1", 80).await.unwrap();

        let refreshed = store.upsert_user(&profile("u1", "After")).await.unwrap();
        assert_eq!(refreshed.name, "After");
        assert_eq!(refreshed.points, 80);
    }
}
