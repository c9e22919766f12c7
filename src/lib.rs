pub mod api;
pub mod config;
pub mod handlers;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::IntakeConfig;
use crate::services::intake::IntakeService;
use axum::{
    Router,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::upload::upload_files,
        handlers::health::health_check,
    ),
    components(
        schemas(
            handlers::upload::UploadResponse,
            handlers::health::HealthResponse,
            models::StagedFile,
        )
    ),
    tags(
        (name = "upload", description = "File intake endpoints"),
        (name = "system", description = "Service health")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub intake: Arc<IntakeService>,
    pub config: IntakeConfig,
}

pub fn create_app(state: AppState) -> Router {
    // The ceiling is per file, not per request: the intake enforces it while
    // streaming and never keeps more than max_file_size on disk per part, so
    // a request-level cap would only mis-reject multi-part uploads.
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/upload", post(handlers::upload::upload_files))
        .route("/health", get(handlers::health::health_check))
        .layer(axum::extract::DefaultBodyLimit::disable())
        .with_state(state)
}
