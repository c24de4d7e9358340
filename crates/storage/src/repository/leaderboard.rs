use sqlx::{FromRow, PgPool};

use crate::dto::leaderboard::LeaderboardEntry;
use crate::error::Result;

#[derive(FromRow)]
struct LeaderboardRow {
    user_id: String,
    name: String,
    image: String,
    points: i64,
    badges: sqlx::types::Json<Vec<String>>,
    sustainability_score: f64,
}

pub struct LeaderboardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LeaderboardRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Top users by points. The secondary key keeps tie order stable across
    /// reads.
    pub async fn top(&self, limit: u32) -> Result<Vec<LeaderboardEntry>> {
        let rows: Vec<LeaderboardRow> = sqlx::query_as(
            r#"
            SELECT user_id, name, image, points, badges, sustainability_score
            FROM users
            ORDER BY points DESC, user_id ASC
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| LeaderboardEntry {
                id: row.user_id,
                name: row.name,
                image: row.image,
                points: row.points,
                badges: row.badges.0,
                sustainability_score: row.sustainability_score,
            })
            .collect())
    }
}
