use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::likes::Like;

use super::StoreError;

/// The likes relation. Pairs `(from_user, to_user)` are unique.
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Fails with `UniquenessConflict` when the pair already exists.
    async fn insert_like(&self, from_user: Uuid, to_user: Uuid) -> Result<Like, StoreError>;

    /// Every like whose both ends are in `{user_a, user_b}`.
    async fn find_pair(&self, user_a: Uuid, user_b: Uuid) -> Result<Vec<Like>, StoreError>;

    async fn list_sent(&self, from_user: Uuid) -> Result<Vec<Like>, StoreError>;

    async fn list_received(&self, to_user: Uuid) -> Result<Vec<Like>, StoreError>;
}

pub struct PgLikeRepository {
    db: Arc<PgPool>,
}

impl PgLikeRepository {
    pub fn new(db: Arc<PgPool>) -> Self {
        PgLikeRepository { db }
    }
}

#[async_trait]
impl LikeRepository for PgLikeRepository {
    async fn insert_like(&self, from_user: Uuid, to_user: Uuid) -> Result<Like, StoreError> {
        let like = sqlx::query_as::<_, Like>(
            "INSERT INTO likes (from_user, to_user, created_at) VALUES ($1, $2, $3)
             RETURNING from_user, to_user, created_at",
        )
        .bind(from_user)
        .bind(to_user)
        .bind(Utc::now())
        .fetch_one(self.db.as_ref())
        .await?;

        Ok(like)
    }

    async fn find_pair(&self, user_a: Uuid, user_b: Uuid) -> Result<Vec<Like>, StoreError> {
        let query = r#"
        SELECT from_user, to_user, created_at
        FROM likes
        WHERE from_user = ANY($1) AND to_user = ANY($1)
        "#;
        let likes = sqlx::query_as::<_, Like>(query)
            .bind(vec![user_a, user_b])
            .fetch_all(self.db.as_ref())
            .await?;

        Ok(likes)
    }

    async fn list_sent(&self, from_user: Uuid) -> Result<Vec<Like>, StoreError> {
        let likes = sqlx::query_as::<_, Like>(
            "SELECT from_user, to_user, created_at FROM likes WHERE from_user = $1",
        )
        .bind(from_user)
        .fetch_all(self.db.as_ref())
        .await?;

        Ok(likes)
    }

    async fn list_received(&self, to_user: Uuid) -> Result<Vec<Like>, StoreError> {
        let likes = sqlx::query_as::<_, Like>(
            "SELECT from_user, to_user, created_at FROM likes WHERE to_user = $1",
        )
        .bind(to_user)
        .fetch_all(self.db.as_ref())
        .await?;

        Ok(likes)
    }
}
