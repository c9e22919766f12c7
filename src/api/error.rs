use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::intake::IntakeError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error(transparent)]
    Intake(#[from] IntakeError),

    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Intake(e) => match e {
                IntakeError::FileTooLarge { .. } => {
                    (StatusCode::PAYLOAD_TOO_LARGE, e.to_string())
                }
                IntakeError::Malformed(msg) => (StatusCode::BAD_REQUEST, msg),
                IntakeError::StagingUnavailable { .. } | IntakeError::Io(_) => {
                    tracing::error!("Intake failure: {:?}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal Server Error".to_string(),
                    )
                }
            },
            AppError::Anyhow(e) => {
                tracing::error!("Anyhow error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::io;
    use std::path::PathBuf;

    async fn error_body(err: AppError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        (status, json["error"].as_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_staging_unavailable_does_not_leak_path() {
        let err = AppError::Intake(IntakeError::StagingUnavailable {
            path: PathBuf::from("/srv/secret/staging"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        });

        let (status, message) = error_body(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Internal Server Error");
    }

    #[tokio::test]
    async fn test_io_error_does_not_leak_detail() {
        let err = AppError::Intake(IntakeError::Io(io::Error::new(
            io::ErrorKind::StorageFull,
            "no space left on /srv/secret/staging",
        )));

        let (status, message) = error_body(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Internal Server Error");
    }

    #[tokio::test]
    async fn test_file_too_large_keeps_its_message() {
        let err = AppError::Intake(IntakeError::FileTooLarge {
            field: "file".to_string(),
            limit: 5 * 1024 * 1024,
        });

        let (status, message) = error_body(err).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(message.contains("too large"));
    }
}
