use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::dto::user::SyncUserRequest;
use crate::error::{Result, StorageError};
use crate::models::User;

#[derive(FromRow)]
pub(crate) struct UserRow {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub image: String,
    pub points: i64,
    pub badges: sqlx::types::Json<Vec<String>>,
    pub sustainability_score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.user_id,
            name: row.name,
            email: row.email,
            image: row.image,
            points: row.points,
            badges: row.badges.0,
            sustainability_score: row.sustainability_score,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const USER_COLUMNS: &str =
    "user_id, name, email, image, points, badges, sustainability_score, created_at, updated_at";

pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    /// Mirror the identity tuple: insert on first sign-in, refresh the
    /// profile fields afterwards. Points and badges are never touched here.
    pub async fn upsert(&self, profile: &SyncUserRequest) -> Result<User> {
        let row: UserRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO users (user_id, name, email, image)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE
            SET name = EXCLUDED.name,
                email = EXCLUDED.email,
                image = EXCLUDED.image,
                updated_at = now()
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&profile.id)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(&profile.image)
        .fetch_one(self.pool)
        .await?;

        Ok(User::from(row))
    }

    /// Atomic in-place increment; the read-modify-write pattern is banned for
    /// counters.
    pub async fn add_points(&self, user_id: &str, delta: i64) -> Result<i64> {
        let points: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE users
            SET points = GREATEST(points + $2, 0),
                updated_at = now()
            WHERE user_id = $1
            RETURNING points
            "#,
        )
        .bind(user_id)
        .bind(delta)
        .fetch_optional(self.pool)
        .await?;

        points.ok_or(StorageError::NotFound)
    }
}
