use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    models::likes::{mutual_pair, LikeOutcome},
    repositories::{like_repository::LikeRepository, StoreError},
    utils::errors::app_error::AppError,
};

use super::ensure_distinct_users;

#[derive(Clone)]
pub struct LikeService {
    like_repository: Arc<dyn LikeRepository>,
}

impl LikeService {
    pub fn new(like_repository: Arc<dyn LikeRepository>) -> Self {
        Self { like_repository }
    }

    /// Stores `from_user -> to_user` and reports whether the reverse like exists.
    /// Repeating a like is a successful no-op.
    #[instrument(skip(self))]
    pub async fn record_like(
        &self,
        from_user: Uuid,
        to_user: Uuid,
    ) -> Result<LikeOutcome, AppError> {
        ensure_distinct_users(from_user, to_user)?;

        let already_liked = match self.like_repository.insert_like(from_user, to_user).await {
            Ok(_) => false,
            Err(StoreError::UniquenessConflict) => {
                debug!("{} already liked {}", from_user, to_user);
                true
            }
            Err(e @ StoreError::UnknownReference(_)) => {
                warn!("Like {} -> {} names an unknown user: {}", from_user, to_user, e);
                return Err(e.into());
            }
            Err(e) => {
                error!("Failed to store like {} -> {}: {}", from_user, to_user, e);
                return Err(e.into());
            }
        };

        let rows = self
            .like_repository
            .find_pair(from_user, to_user)
            .await
            .map_err(|e| {
                error!(
                    "Failed to read likes between {} and {}: {}",
                    from_user, to_user, e
                );
                AppError::from(e)
            })?;

        let outcome = LikeOutcome {
            matched: mutual_pair(&rows, from_user, to_user),
            already_liked,
        };
        if outcome.is_new_match() {
            info!("New match between {} and {}", from_user, to_user);
        }

        Ok(outcome)
    }
}
