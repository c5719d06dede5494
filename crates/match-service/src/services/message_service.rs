use std::sync::Arc;

use tracing::{error, instrument};
use uuid::Uuid;

use crate::{
    models::messages::{Message, MAX_MESSAGE_LENGTH},
    repositories::message_repository::MessageRepository,
    utils::errors::app_error::AppError,
};

use super::ensure_distinct_users;

/// Writes chat messages. Only `ChatGate::submit` calls `send`, after the pair
/// has been verified as matched.
#[derive(Clone)]
pub struct MessageService {
    message_repository: Arc<dyn MessageRepository>,
}

impl MessageService {
    pub fn new(message_repository: Arc<dyn MessageRepository>) -> Self {
        Self { message_repository }
    }

    #[instrument(skip(self, body))]
    pub(crate) async fn send(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        body: &str,
    ) -> Result<Message, AppError> {
        ensure_distinct_users(sender_id, recipient_id)?;
        let body = body.trim();
        if body.is_empty() {
            return Err(AppError::InvalidArgument(
                "message body must not be empty".to_string(),
            ));
        }
        if body.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(AppError::InvalidArgument(format!(
                "message body exceeds {} characters",
                MAX_MESSAGE_LENGTH
            )));
        }

        self.message_repository
            .insert_message(sender_id, recipient_id, body)
            .await
            .map_err(|e| {
                error!("Failed to store message from {}: {}", sender_id, e);
                AppError::from(e)
            })
    }
}
