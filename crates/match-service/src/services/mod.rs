use uuid::Uuid;

use crate::utils::errors::app_error::AppError;

pub mod chat_gate;
pub mod like_service;
pub mod match_service;
pub mod message_service;

pub(crate) fn ensure_user_id(id: Uuid) -> Result<(), AppError> {
    if id.is_nil() {
        return Err(AppError::InvalidArgument("user id must not be nil".to_string()));
    }
    Ok(())
}

/// Both ids usable and distinct.
pub(crate) fn ensure_distinct_users(actor: Uuid, target: Uuid) -> Result<(), AppError> {
    ensure_user_id(actor)?;
    ensure_user_id(target)?;
    if actor == target {
        return Err(AppError::InvalidArgument(format!(
            "user {} cannot target themselves",
            actor
        )));
    }
    Ok(())
}
