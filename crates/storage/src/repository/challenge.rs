use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::dto::challenge::CreateChallengeRequest;
use crate::error::{Result, StorageError};
use crate::models::{Category, Challenge, ChallengeMetrics};
use crate::store::ProgressUpdate;

#[derive(FromRow)]
pub(crate) struct ChallengeRow {
    pub challenge_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub points: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_by: String,
    pub total_impact: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct ParticipantRow {
    challenge_id: Uuid,
    user_id: String,
    completed_at: Option<DateTime<Utc>>,
}

const CHALLENGE_COLUMNS: &str = "challenge_id, title, description, category, points, \
     start_date, end_date, created_by, total_impact, created_at";

fn assemble(row: ChallengeRow, participants: Vec<ParticipantRow>) -> Challenge {
    let completed_by: Vec<String> = participants
        .iter()
        .filter(|p| p.completed_at.is_some())
        .map(|p| p.user_id.clone())
        .collect();
    let participants: Vec<String> = participants.into_iter().map(|p| p.user_id).collect();
    let metrics = ChallengeMetrics::recompute(
        participants.len() as i64,
        completed_by.len() as i64,
        row.total_impact,
    );

    Challenge {
        id: row.challenge_id,
        title: row.title,
        description: row.description,
        category: row.category.parse().unwrap_or(Category::Other),
        points: row.points,
        start_date: row.start_date,
        end_date: row.end_date,
        created_by: row.created_by,
        participants,
        completed_by,
        metrics,
        created_at: row.created_at,
    }
}

pub struct ChallengeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ChallengeRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, req: &CreateChallengeRequest) -> Result<Challenge> {
        let now = Utc::now();
        let row: ChallengeRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO challenges
                (title, description, category, points, start_date, end_date, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {CHALLENGE_COLUMNS}
            "#
        ))
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.category.as_str())
        .bind(req.points)
        .bind(now)
        .bind(now + Duration::days(req.duration_days))
        .bind(&req.created_by)
        .fetch_one(self.pool)
        .await?;

        Ok(assemble(row, Vec::new()))
    }

    pub async fn find_by_id(&self, challenge_id: Uuid) -> Result<Challenge> {
        let row: ChallengeRow = sqlx::query_as(&format!(
            "SELECT {CHALLENGE_COLUMNS} FROM challenges WHERE challenge_id = $1"
        ))
        .bind(challenge_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        let mut participants = self.load_participants(&[challenge_id]).await?;
        Ok(assemble(
            row,
            participants.remove(&challenge_id).unwrap_or_default(),
        ))
    }

    /// Challenges whose window is still open, soonest-ending first.
    pub async fn list_active(&self) -> Result<Vec<Challenge>> {
        let rows: Vec<ChallengeRow> = sqlx::query_as(&format!(
            r#"
            SELECT {CHALLENGE_COLUMNS}
            FROM challenges
            WHERE end_date > now()
            ORDER BY end_date ASC
            "#
        ))
        .fetch_all(self.pool)
        .await?;

        self.assemble_all(rows).await
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Challenge>> {
        let rows: Vec<ChallengeRow> = sqlx::query_as(&format!(
            r#"
            SELECT {CHALLENGE_COLUMNS}
            FROM challenges
            WHERE challenge_id IN (
                SELECT challenge_id FROM challenge_participants WHERE user_id = $1
            )
            ORDER BY start_date DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        self.assemble_all(rows).await
    }

    pub async fn join(&self, challenge_id: Uuid, user_id: &str) -> Result<Challenge> {
        self.ensure_exists(challenge_id).await?;

        // Duplicate joins lose the insert race on the primary key instead of
        // racing a read-then-write check.
        let result = sqlx::query(
            r#"
            INSERT INTO challenge_participants (challenge_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (challenge_id, user_id) DO NOTHING
            "#,
        )
        .bind(challenge_id)
        .bind(user_id)
        .execute(self.pool)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.is_foreign_key_violation() {
                StorageError::NotFound
            } else {
                err
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(StorageError::Conflict(
                "Already joined this challenge".into(),
            ));
        }

        self.find_by_id(challenge_id).await
    }

    /// Move a participant's own progress marker, returning where it came
    /// from so the caller can award step crossings.
    pub async fn record_progress(
        &self,
        challenge_id: Uuid,
        user_id: &str,
        percent: i64,
    ) -> Result<ProgressUpdate> {
        self.ensure_exists(challenge_id).await?;

        let previous: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE challenge_participants AS cp
            SET progress_percent = $3
            FROM (
                SELECT progress_percent AS previous
                FROM challenge_participants
                WHERE challenge_id = $1 AND user_id = $2
                FOR UPDATE
            ) AS old
            WHERE cp.challenge_id = $1 AND cp.user_id = $2
            RETURNING old.previous
            "#,
        )
        .bind(challenge_id)
        .bind(user_id)
        .bind(percent)
        .fetch_optional(self.pool)
        .await?;

        let previous = previous.ok_or_else(|| {
            StorageError::Conflict("Not a participant in this challenge".into())
        })?;

        Ok(ProgressUpdate {
            previous_percent: previous,
            current_percent: percent,
        })
    }

    pub async fn complete(
        &self,
        challenge_id: Uuid,
        user_id: &str,
        impact_value: f64,
    ) -> Result<Challenge> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<Uuid> = sqlx::query_scalar(
            "SELECT challenge_id FROM challenges WHERE challenge_id = $1 FOR UPDATE",
        )
        .bind(challenge_id)
        .fetch_optional(&mut *tx)
        .await?;
        if locked.is_none() {
            return Err(StorageError::NotFound);
        }

        let completed_at: Option<Option<DateTime<Utc>>> = sqlx::query_scalar(
            r#"
            SELECT completed_at FROM challenge_participants
            WHERE challenge_id = $1 AND user_id = $2
            FOR UPDATE
            "#,
        )
        .bind(challenge_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        match completed_at {
            None => {
                return Err(StorageError::Conflict(
                    "Not a participant in this challenge".into(),
                ));
            }
            Some(Some(_)) => {
                return Err(StorageError::Conflict(
                    "Already completed this challenge".into(),
                ));
            }
            Some(None) => {}
        }

        sqlx::query(
            r#"
            UPDATE challenge_participants
            SET completed_at = now(), progress_percent = 100
            WHERE challenge_id = $1 AND user_id = $2
            "#,
        )
        .bind(challenge_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE challenges SET total_impact = total_impact + $2 WHERE challenge_id = $1",
        )
        .bind(challenge_id)
        .bind(impact_value)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.find_by_id(challenge_id).await
    }

    async fn ensure_exists(&self, challenge_id: Uuid) -> Result<()> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM challenges WHERE challenge_id = $1)")
                .bind(challenge_id)
                .fetch_one(self.pool)
                .await?;

        if exists {
            Ok(())
        } else {
            Err(StorageError::NotFound)
        }
    }

    async fn assemble_all(&self, rows: Vec<ChallengeRow>) -> Result<Vec<Challenge>> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.challenge_id).collect();
        let mut participants = self.load_participants(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let members = participants.remove(&row.challenge_id).unwrap_or_default();
                assemble(row, members)
            })
            .collect())
    }

    async fn load_participants(
        &self,
        challenge_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<ParticipantRow>>> {
        if challenge_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<ParticipantRow> = sqlx::query_as(
            r#"
            SELECT challenge_id, user_id, completed_at
            FROM challenge_participants
            WHERE challenge_id = ANY($1)
            ORDER BY joined_at
            "#,
        )
        .bind(challenge_ids)
        .fetch_all(self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<ParticipantRow>> = HashMap::new();
        for row in rows {
            grouped.entry(row.challenge_id).or_default().push(row);
        }
        Ok(grouped)
    }
}
