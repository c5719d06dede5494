use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    models::messages::Message,
    services::chat_gate::{ChatGate, GateState, SubmitOutcome},
    utils::errors::{app_error::AppError, error_payload::ErrorPayload},
    AppState,
};

const TAG: &str = "chats";

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GateResponse {
    #[serde(flatten)]
    pub state: GateState,
    pub notice: Option<String>,
}

impl From<GateState> for GateResponse {
    fn from(state: GateState) -> Self {
        GateResponse {
            state,
            notice: state.notice().map(str::to_string),
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct SendMessageBody {
    pub body: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<SubmitOutcome> for SendMessageResponse {
    fn from(outcome: SubmitOutcome) -> Self {
        match outcome {
            SubmitOutcome::Sent(message) => SendMessageResponse {
                sent: true,
                message: Some(message),
                warning: None,
            },
            SubmitOutcome::Rejected { warning } => SendMessageResponse {
                sent: false,
                message: None,
                warning: Some(warning),
            },
        }
    }
}

/// Whether the viewer may write to the counterpart
///
/// Evaluated on every request. Failed lookups deny.
#[utoipa::path(
    get,
    tag = TAG,
    path = "/{viewer}/{counterpart}/gate",
    operation_id = "getChatGate",
    responses(
        (status = 200, description = "Gate decision", body = GateResponse)
    ),
    params(
        ("viewer" = Uuid, Path, description = "User opening the conversation"),
        ("counterpart" = Uuid, Path, description = "Other participant")
    )
)]
pub(super) async fn get_gate(
    State(app_state): State<Arc<AppState>>,
    Path((viewer, counterpart)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let mut gate = ChatGate::new(viewer);
    let state = gate.evaluate(&app_state.match_service, counterpart).await;
    (StatusCode::OK, Json(GateResponse::from(state)))
}

/// Send a message through the chat gate
///
/// When the pair is not matched the message is not stored and a warning is returned.
#[utoipa::path(
    post,
    tag = TAG,
    path = "/{viewer}/{counterpart}/messages",
    operation_id = "sendMessage",
    responses(
        (status = 200, description = "Message sent or rejected by the gate", body = SendMessageResponse),
        (status = 400, description = "Invalid message body", body = ErrorPayload),
        (status = 503, description = "Store unavailable", body = ErrorPayload)
    ),
    params(
        ("viewer" = Uuid, Path, description = "Sender"),
        ("counterpart" = Uuid, Path, description = "Recipient")
    ),
    request_body = SendMessageBody
)]
pub(super) async fn send_message(
    State(app_state): State<Arc<AppState>>,
    Path((viewer, counterpart)): Path<(Uuid, Uuid)>,
    Json(body): Json<SendMessageBody>,
) -> Result<impl IntoResponse, AppError> {
    let mut gate = ChatGate::new(viewer);
    gate.evaluate(&app_state.match_service, counterpart).await;
    let outcome = gate.submit(&app_state.message_service, &body.body).await?;
    Ok((StatusCode::OK, Json(SendMessageResponse::from(outcome))))
}
