use storage::{Store, dto::leaderboard::LeaderboardEntry, error::Result};

/// Top users by points. The board is decorative, so a briefly unreachable
/// store shows as an empty board instead of an error page.
pub async fn top(store: &dyn Store, limit: u32) -> Result<Vec<LeaderboardEntry>> {
    match store.leaderboard(limit).await {
        Ok(entries) => Ok(entries),
        Err(err) if err.is_unavailable() => {
            tracing::warn!("Leaderboard unavailable: {err}");
            Ok(Vec::new())
        }
        Err(err) => Err(err),
    }
}
