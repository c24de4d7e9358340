use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::dto::message::PostMessageRequest;
use crate::error::{Result, StorageError};
use crate::models::ChatMessage;

#[derive(FromRow)]
pub(crate) struct MessageRow {
    pub message_id: Uuid,
    pub content: String,
    pub user_id: String,
    pub user_name: String,
    pub user_image: Option<String>,
    pub challenge_id: Option<Uuid>,
    pub sent_at: DateTime<Utc>,
}

impl From<MessageRow> for ChatMessage {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.message_id,
            content: row.content,
            user_id: row.user_id,
            user_name: row.user_name,
            user_image: row.user_image,
            challenge_id: row.challenge_id,
            sent_at: row.sent_at,
        }
    }
}

const MESSAGE_COLUMNS: &str =
    "message_id, content, user_id, user_name, user_image, challenge_id, sent_at";

pub struct MessageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MessageRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, req: &PostMessageRequest) -> Result<ChatMessage> {
        let row: MessageRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO messages (content, user_id, user_name, user_image, challenge_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {MESSAGE_COLUMNS}
            "#
        ))
        .bind(&req.content)
        .bind(&req.user_id)
        .bind(&req.user_name)
        .bind(&req.user_image)
        .bind(req.challenge_id)
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

        Ok(ChatMessage::from(row))
    }

    /// Channel history, oldest first. The global channel is the set of
    /// messages with no challenge scope.
    pub async fn list_channel(
        &self,
        challenge_id: Option<Uuid>,
        limit: u32,
    ) -> Result<Vec<ChatMessage>> {
        let rows: Vec<MessageRow> = match challenge_id {
            Some(challenge_id) => {
                sqlx::query_as(&format!(
                    r#"
                    SELECT {MESSAGE_COLUMNS} FROM messages
                    WHERE challenge_id = $1
                    ORDER BY sent_at ASC, message_id
                    LIMIT $2
                    "#
                ))
                .bind(challenge_id)
                .bind(i64::from(limit))
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    r#"
                    SELECT {MESSAGE_COLUMNS} FROM messages
                    WHERE challenge_id IS NULL
                    ORDER BY sent_at ASC, message_id
                    LIMIT $1
                    "#
                ))
                .bind(i64::from(limit))
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(ChatMessage::from).collect())
    }
}
