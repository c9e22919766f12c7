use crate::api::error::AppError;
use crate::models::StagedFile;
use axum::{Json, extract::Multipart, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    pub files: Vec<StagedFile>,
}

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = Multipart, description = "One or more file parts"),
    responses(
        (status = 200, description = "All parts staged", body = UploadResponse),
        (status = 400, description = "Malformed multipart request"),
        (status = 413, description = "A part exceeds the size limit; nothing is staged")
    ),
    tag = "upload"
)]
pub async fn upload_files(
    State(state): State<crate::AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let files = state.intake.accept(multipart).await?;

    if files.is_empty() {
        return Err(AppError::BadRequest("No file provided".to_string()));
    }

    tracing::info!("📦 Staged {} file(s)", files.len());

    Ok(Json(UploadResponse { files }))
}
