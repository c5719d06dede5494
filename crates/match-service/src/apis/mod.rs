use std::sync::Arc;

use axum::Router;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_scalar::{Scalar, Servable};

use crate::AppState;

pub mod chat_handlers;
pub mod like_handlers;
pub mod match_handlers;

#[derive(OpenApi)]
#[openapi(
    tags(
        (name = "likes", description = "Recording likes"),
        (name = "matches", description = "Mutual matches and browsing"),
        (name = "chats", description = "Match-gated messaging")
    )
)]
pub struct ApiDoc;

pub fn setup_routes() -> Router<Arc<AppState>> {
    let api_doc = ApiDoc::openapi();

    let like_router = OpenApiRouter::new().routes(routes!(like_handlers::record_like));

    let match_router = OpenApiRouter::new()
        .routes(routes!(match_handlers::is_matched))
        .routes(routes!(match_handlers::list_matches))
        .routes(routes!(match_handlers::list_received_likes))
        .routes(routes!(match_handlers::fetch_candidates));

    let chat_router = OpenApiRouter::new()
        .routes(routes!(chat_handlers::get_gate))
        .routes(routes!(chat_handlers::send_message));

    let chat_router = OpenApiRouter::with_openapi(api_doc.clone()).nest("/chats", chat_router);

    let router = OpenApiRouter::with_openapi(api_doc)
        .merge(like_router)
        .merge(match_router)
        .merge(chat_router);

    let (api_router, api_openapi) = OpenApiRouter::new()
        .nest("/api/v1", router)
        .split_for_parts();

    Router::new()
        .merge(Scalar::with_url("/docs", api_openapi))
        .merge(api_router)
}
