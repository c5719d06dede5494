use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    models::likes::LikeOutcome,
    utils::errors::{app_error::AppError, error_payload::ErrorPayload},
    AppState,
};

const TAG: &str = "likes";

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordLikeBody {
    pub from_user: Uuid,
    pub to_user: Uuid,
}

/// Like a user
///
/// Repeating a like succeeds with `alreadyLiked` set.
#[utoipa::path(
    post,
    tag = TAG,
    path = "/likes",
    operation_id = "recordLike",
    responses(
        (status = 200, description = "Like recorded", body = LikeOutcome),
        (status = 400, description = "Self-like or invalid user id", body = ErrorPayload),
        (status = 404, description = "Either user does not exist", body = ErrorPayload),
        (status = 503, description = "Store unavailable", body = ErrorPayload)
    ),
    request_body = RecordLikeBody
)]
pub(super) async fn record_like(
    State(app_state): State<Arc<AppState>>,
    Json(body): Json<RecordLikeBody>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = app_state
        .like_service
        .record_like(body.from_user, body.to_user)
        .await?;
    Ok((StatusCode::OK, Json(outcome)))
}
