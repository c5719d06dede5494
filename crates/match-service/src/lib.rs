use apis::setup_routes;
use axum::Router;
use repositories::{
    like_repository::PgLikeRepository, message_repository::PgMessageRepository,
    profile_repository::PgProfileRepository,
};
use services::{
    like_service::LikeService,
    match_service::{MatchService, DEFAULT_CANDIDATE_PAGE_SIZE},
    message_service::MessageService,
};
use sqlx::postgres::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

pub mod apis;
pub mod models;
pub mod repositories;
pub mod services;
pub mod settings;
pub mod utils;

pub struct AppState {
    pub like_service: LikeService,
    pub match_service: MatchService,
    pub message_service: MessageService,
}

pub async fn setup_database(settings: &settings::Settings) -> Result<Arc<PgPool>, sqlx::Error> {
    let pool = PgPool::connect(&settings.database_url).await?;
    if settings.run_migrations.unwrap_or(false) {
        info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }
    Ok(Arc::new(pool))
}

pub async fn setup_router(
    settings: &settings::Settings,
) -> Result<Router, Box<dyn std::error::Error>> {
    let db = setup_database(settings).await?;
    let app_state = setup_services(db, settings);
    let router = setup_routes();

    Ok(router
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(app_state)))
}

pub fn setup_services(db: Arc<PgPool>, settings: &settings::Settings) -> AppState {
    let like_repository = Arc::new(PgLikeRepository::new(db.clone()));
    let profile_repository = Arc::new(PgProfileRepository::new(db.clone()));
    let message_repository = Arc::new(PgMessageRepository::new(db));

    let page_size = settings
        .candidate_page_size
        .unwrap_or(DEFAULT_CANDIDATE_PAGE_SIZE);

    AppState {
        like_service: LikeService::new(like_repository.clone()),
        match_service: MatchService::new(like_repository, profile_repository, page_size),
        message_service: MessageService::new(message_repository),
    }
}

/// Plain output in production, debug-level coloured output everywhere else.
pub fn init_tracing(settings: &settings::Settings) {
    let production = settings.is_production();
    let level = if production {
        tracing::Level::INFO
    } else {
        tracing::Level::DEBUG
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(!production)
        .init();
}
