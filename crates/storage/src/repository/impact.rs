use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::dto::impact::LogImpactRequest;
use crate::error::{Result, StorageError};
use crate::models::{Category, ImpactMetric};

#[derive(FromRow)]
pub(crate) struct MetricRow {
    pub metric_id: Uuid,
    pub user_id: String,
    pub category: String,
    pub value: f64,
    pub description: Option<String>,
    pub logged_at: DateTime<Utc>,
}

impl From<MetricRow> for ImpactMetric {
    fn from(row: MetricRow) -> Self {
        Self {
            id: row.metric_id,
            user_id: row.user_id,
            category: row.category.parse().unwrap_or(Category::Other),
            value: row.value,
            description: row.description,
            logged_at: row.logged_at,
        }
    }
}

pub struct ImpactRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ImpactRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a metric with a server-assigned timestamp. The row is
    /// immutable from this point on.
    pub async fn insert(&self, req: &LogImpactRequest) -> Result<ImpactMetric> {
        let row: MetricRow = sqlx::query_as(
            r#"
            INSERT INTO impact_metrics (user_id, category, value, description)
            VALUES ($1, $2, $3, $4)
            RETURNING metric_id, user_id, category, value, description, logged_at
            "#,
        )
        .bind(&req.user_id)
        .bind(req.category.as_str())
        .bind(req.value)
        .bind(&req.description)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.is_foreign_key_violation() {
                StorageError::NotFound
            } else {
                err
            }
        })?;

        Ok(ImpactMetric::from(row))
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<ImpactMetric>> {
        let rows: Vec<MetricRow> = sqlx::query_as(
            r#"
            SELECT metric_id, user_id, category, value, description, logged_at
            FROM impact_metrics
            WHERE user_id = $1
            ORDER BY logged_at DESC, metric_id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ImpactMetric::from).collect())
    }
}
