use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    models::{
        likes::{Like, Match},
        profiles::{Candidate, CandidateOptions},
    },
    utils::errors::{app_error::AppError, error_payload::ErrorPayload},
    AppState,
};

const TAG: &str = "matches";

#[derive(Serialize, ToSchema)]
pub struct MatchStatusResponse {
    pub matched: bool,
}

/// Check whether two users liked each other
#[utoipa::path(
    get,
    tag = TAG,
    path = "/matches/{user_a}/{user_b}",
    operation_id = "isMatched",
    responses(
        (status = 200, description = "Match status", body = MatchStatusResponse),
        (status = 400, description = "Invalid user id", body = ErrorPayload),
        (status = 503, description = "Match status could not be determined", body = ErrorPayload)
    ),
    params(
        ("user_a" = Uuid, Path, description = "First user"),
        ("user_b" = Uuid, Path, description = "Second user")
    )
)]
pub(super) async fn is_matched(
    State(app_state): State<Arc<AppState>>,
    Path((user_a, user_b)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let matched = app_state.match_service.is_matched(user_a, user_b).await?;
    Ok((StatusCode::OK, Json(MatchStatusResponse { matched })))
}

/// List a user's matches
#[utoipa::path(
    get,
    tag = TAG,
    path = "/users/{id}/matches",
    operation_id = "listMatches",
    responses(
        (status = 200, description = "Matches, newest first", body = Vec<Match>),
        (status = 400, description = "Invalid user id", body = ErrorPayload),
        (status = 503, description = "Store unavailable", body = ErrorPayload)
    ),
    params(
        ("id" = Uuid, Path, description = "User ID")
    )
)]
pub(super) async fn list_matches(
    State(app_state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let matches = app_state.match_service.list_matches(user_id).await?;
    Ok((StatusCode::OK, Json(matches)))
}

/// List likes a user has not answered yet
#[utoipa::path(
    get,
    tag = TAG,
    path = "/users/{id}/likes/received",
    operation_id = "listReceivedLikes",
    responses(
        (status = 200, description = "Pending likes, newest first", body = Vec<Like>),
        (status = 400, description = "Invalid user id", body = ErrorPayload),
        (status = 503, description = "Store unavailable", body = ErrorPayload)
    ),
    params(
        ("id" = Uuid, Path, description = "User ID")
    )
)]
pub(super) async fn list_received_likes(
    State(app_state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let likes = app_state.match_service.list_received_likes(user_id).await?;
    Ok((StatusCode::OK, Json(likes)))
}

/// Browse candidate profiles
///
/// Store failures produce an empty page rather than an error.
#[utoipa::path(
    get,
    tag = TAG,
    path = "/users/{id}/candidates",
    operation_id = "fetchCandidates",
    responses(
        (status = 200, description = "Candidates, most recently active first", body = Vec<Candidate>),
        (status = 400, description = "Invalid user id", body = ErrorPayload)
    ),
    params(
        ("id" = Uuid, Path, description = "User ID"),
        CandidateOptions
    )
)]
pub(super) async fn fetch_candidates(
    State(app_state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Query(options): Query<CandidateOptions>,
) -> Result<impl IntoResponse, AppError> {
    let candidates = match app_state
        .match_service
        .fetch_candidates(user_id, &options)
        .await
    {
        Ok(candidates) => candidates,
        Err(AppError::StoreUnavailable(reason)) => {
            warn!("Serving no candidates to {}: {}", user_id, reason);
            Vec::new()
        }
        Err(e) => return Err(e),
    };
    Ok((StatusCode::OK, Json(candidates)))
}
