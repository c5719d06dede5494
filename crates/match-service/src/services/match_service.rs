use std::{collections::HashSet, sync::Arc};

use tracing::{error, instrument, warn};
use uuid::Uuid;

use crate::{
    models::{
        likes::{matched_at, mutual_pair, Like, Match},
        profiles::{Candidate, CandidateOptions, CandidateQuery, GenderPreference, Profile},
    },
    repositories::{like_repository::LikeRepository, profile_repository::ProfileRepository},
    utils::errors::app_error::AppError,
};

use super::ensure_user_id;

pub const DEFAULT_CANDIDATE_PAGE_SIZE: usize = 50;

/// Read-only queries over likes and profiles.
#[derive(Clone)]
pub struct MatchService {
    like_repository: Arc<dyn LikeRepository>,
    profile_repository: Arc<dyn ProfileRepository>,
    page_size: usize,
}

impl MatchService {
    pub fn new(
        like_repository: Arc<dyn LikeRepository>,
        profile_repository: Arc<dyn ProfileRepository>,
        page_size: usize,
    ) -> Self {
        Self {
            like_repository,
            profile_repository,
            page_size,
        }
    }

    /// Whether both users liked each other. Every mutual check in the crate goes
    /// through here or `mutual_pair`.
    ///
    /// An `Err` means the answer is unknown; callers gating chat must treat it as
    /// not matched.
    #[instrument(skip(self))]
    pub async fn is_matched(&self, user_a: Uuid, user_b: Uuid) -> Result<bool, AppError> {
        ensure_user_id(user_a)?;
        ensure_user_id(user_b)?;
        if user_a == user_b {
            return Ok(false);
        }

        let rows = self
            .like_repository
            .find_pair(user_a, user_b)
            .await
            .map_err(|e| {
                error!(
                    "Failed to read likes between {} and {}: {}",
                    user_a, user_b, e
                );
                AppError::from(e)
            })?;

        Ok(mutual_pair(&rows, user_a, user_b))
    }

    /// Everyone `user_id` has a mutual like with, newest match first.
    #[instrument(skip(self))]
    pub async fn list_matches(&self, user_id: Uuid) -> Result<Vec<Match>, AppError> {
        ensure_user_id(user_id)?;
        let sent = self
            .like_repository
            .list_sent(user_id)
            .await
            .map_err(|e| {
                error!("Failed to read likes sent by {}: {}", user_id, e);
                AppError::from(e)
            })?;
        let received = self
            .like_repository
            .list_received(user_id)
            .await
            .map_err(|e| {
                error!("Failed to read likes received by {}: {}", user_id, e);
                AppError::from(e)
            })?;

        let rows: Vec<Like> = sent.iter().chain(received.iter()).cloned().collect();
        let mut matches: Vec<Match> = sent
            .iter()
            .filter(|like| like.to_user != user_id)
            .filter_map(|like| {
                matched_at(&rows, user_id, like.to_user).map(|at| Match {
                    user_id: like.to_user,
                    matched_at: at,
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.matched_at
                .cmp(&a.matched_at)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        matches.dedup_by_key(|m| m.user_id);
        Ok(matches)
    }

    /// Likes `user_id` received and has not answered, newest first.
    #[instrument(skip(self))]
    pub async fn list_received_likes(&self, user_id: Uuid) -> Result<Vec<Like>, AppError> {
        ensure_user_id(user_id)?;
        let received = self
            .like_repository
            .list_received(user_id)
            .await
            .map_err(|e| {
                error!("Failed to read likes received by {}: {}", user_id, e);
                AppError::from(e)
            })?;
        let answered: HashSet<Uuid> = self
            .like_repository
            .list_sent(user_id)
            .await
            .map_err(|e| {
                error!("Failed to read likes sent by {}: {}", user_id, e);
                AppError::from(e)
            })?
            .into_iter()
            .map(|like| like.to_user)
            .collect();

        let mut pending: Vec<Like> = received
            .into_iter()
            .filter(|like| like.from_user != user_id && !answered.contains(&like.from_user))
            .collect();
        pending.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(pending)
    }

    /// One page of profiles `user_id` may browse.
    #[instrument(skip(self))]
    pub async fn fetch_candidates(
        &self,
        user_id: Uuid,
        options: &CandidateOptions,
    ) -> Result<Vec<Candidate>, AppError> {
        ensure_user_id(user_id)?;

        let viewer = self
            .profile_repository
            .find_by_id(user_id)
            .await
            .map_err(|e| {
                error!("Failed to read profile {}: {}", user_id, e);
                AppError::from(e)
            })?;
        let preference = match viewer {
            Some(profile) => profile.gender_preference,
            None => {
                warn!(
                    "No profile for {}, browsing without a gender preference",
                    user_id
                );
                GenderPreference::Any
            }
        };

        let exclude: Vec<Uuid> = if options.exclude_liked {
            self.like_repository
                .list_sent(user_id)
                .await
                .map_err(|e| {
                    error!("Failed to read likes sent by {}: {}", user_id, e);
                    AppError::from(e)
                })?
                .into_iter()
                .map(|like| like.to_user)
                .collect()
        } else {
            Vec::new()
        };

        let limit = options
            .limit
            .unwrap_or(self.page_size)
            .min(self.page_size);
        let query = CandidateQuery {
            viewer: user_id,
            gender: match preference {
                GenderPreference::Only(gender) => Some(gender),
                GenderPreference::Any => None,
            },
            exclude,
            limit,
        };

        let profiles = self
            .profile_repository
            .list_candidates(&query)
            .await
            .map_err(|e| {
                error!("Failed to list candidates for {}: {}", user_id, e);
                AppError::from(e)
            })?;
        Ok(select_candidates(&query, profiles))
    }
}

/// Re-checks the browse rules on whatever the store returned.
fn select_candidates(query: &CandidateQuery, profiles: Vec<Profile>) -> Vec<Candidate> {
    let mut selected: Vec<Profile> = profiles.into_iter().filter(|p| query.admits(p)).collect();

    selected.sort_by(|a, b| a.cmp_activity(b));
    selected.truncate(query.limit);
    selected.into_iter().map(Candidate::from).collect()
}
