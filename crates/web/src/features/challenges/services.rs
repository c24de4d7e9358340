use uuid::Uuid;

use storage::{
    Store,
    dto::challenge::{CreateChallengeRequest, ProgressResponse},
    error::Result,
    models::Challenge,
    services::scoring::{self, CompletionOutcome},
};

pub async fn create_challenge(store: &dyn Store, req: &CreateChallengeRequest) -> Result<Challenge> {
    store.create_challenge(req).await
}

pub async fn get_challenge(store: &dyn Store, challenge_id: Uuid) -> Result<Challenge> {
    store.get_challenge(challenge_id).await
}

/// Open challenge list for the dashboard. A briefly unreachable store shows
/// as an empty board instead of an error page.
pub async fn active_challenges(store: &dyn Store) -> Result<Vec<Challenge>> {
    match store.active_challenges().await {
        Ok(challenges) => Ok(challenges),
        Err(err) if err.is_unavailable() => {
            tracing::warn!("Active challenge listing unavailable: {err}");
            Ok(Vec::new())
        }
        Err(err) => Err(err),
    }
}

pub async fn user_challenges(store: &dyn Store, user_id: &str) -> Result<Vec<Challenge>> {
    store.user_challenges(user_id).await
}

pub async fn join_challenge(store: &dyn Store, challenge_id: Uuid, user_id: &str) -> Result<Challenge> {
    store.join_challenge(challenge_id, user_id).await
}

pub async fn record_progress(
    store: &dyn Store,
    challenge_id: Uuid,
    user_id: &str,
    percent: i64,
) -> Result<ProgressResponse> {
    scoring::record_progress(store, challenge_id, user_id, percent).await
}

pub async fn complete_challenge(
    store: &dyn Store,
    challenge_id: Uuid,
    user_id: &str,
    impact_value: f64,
) -> Result<CompletionOutcome> {
    scoring::complete_challenge(store, challenge_id, user_id, impact_value).await
}
