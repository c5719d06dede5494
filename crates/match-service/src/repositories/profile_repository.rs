use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::profiles::{CandidateQuery, Profile, ProfileRow, ProfileType};

use super::StoreError;

/// Read-only view of user profiles.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, StoreError>;

    /// Profiles for which `query.admits` holds, most recently active first,
    /// at most `query.limit` of them.
    async fn list_candidates(&self, query: &CandidateQuery) -> Result<Vec<Profile>, StoreError>;
}

pub struct PgProfileRepository {
    db: Arc<PgPool>,
}

impl PgProfileRepository {
    pub fn new(db: Arc<PgPool>) -> Self {
        PgProfileRepository { db }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        let query = r#"
        SELECT id, display_name, gender, gender_preference, profile_type, avatar_url, last_active_at
        FROM profiles
        WHERE id = $1
        "#;
        let row = sqlx::query_as::<_, ProfileRow>(query)
            .bind(id)
            .fetch_optional(self.db.as_ref())
            .await?;

        Ok(row.map(Profile::from))
    }

    async fn list_candidates(&self, query: &CandidateQuery) -> Result<Vec<Profile>, StoreError> {
        let sql = r#"
        SELECT id, display_name, gender, gender_preference, profile_type, avatar_url, last_active_at
        FROM profiles
        WHERE id <> $1
          AND NOT (lower(btrim(profile_type, E' \t\r\n')) = ANY($5))
          AND avatar_url IS NOT NULL
          AND btrim(avatar_url, E' \t\r\n') <> ''
          AND ($2::text[] IS NULL OR lower(btrim(gender, E' \t\r\n')) = ANY($2))
          AND NOT (id = ANY($3))
        ORDER BY last_active_at DESC NULLS LAST, id ASC
        LIMIT $4
        "#;
        // Trim and alias sets mirror the `ProfileRow -> Profile` parsing.
        let rows = sqlx::query_as::<_, ProfileRow>(sql)
            .bind(query.viewer)
            .bind(query.gender_aliases())
            .bind(query.exclude.clone())
            .bind(query.limit as i64)
            .bind(ProfileType::VENUE_ALIASES.map(String::from).to_vec())
            .fetch_all(self.db.as_ref())
            .await?;

        Ok(rows.into_iter().map(Profile::from).collect())
    }
}
