use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::messages::Message;

use super::StoreError;

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn insert_message(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        body: &str,
    ) -> Result<Message, StoreError>;
}

pub struct PgMessageRepository {
    db: Arc<PgPool>,
}

impl PgMessageRepository {
    pub fn new(db: Arc<PgPool>) -> Self {
        PgMessageRepository { db }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn insert_message(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        body: &str,
    ) -> Result<Message, StoreError> {
        let message = sqlx::query_as::<_, Message>(
            "INSERT INTO messages (id, sender_id, recipient_id, body, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, sender_id, recipient_id, body, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(sender_id)
        .bind(recipient_id)
        .bind(body)
        .bind(Utc::now())
        .fetch_one(self.db.as_ref())
        .await?;

        Ok(message)
    }
}
