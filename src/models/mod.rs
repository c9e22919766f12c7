use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use utoipa::ToSchema;

/// Handle returned for each persisted upload part. Ownership of the file on
/// disk passes to whoever consumes the handle; the intake boundary does not
/// track it further.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StagedFile {
    /// Absolute path of the staged file
    #[schema(value_type = String)]
    pub path: PathBuf,
    /// Filename as sent by the client, after sanitization
    pub original_filename: String,
    /// Size in bytes as written to disk
    pub size: u64,
    /// Multipart field name the part arrived under
    pub field_name: String,
    pub staged_at: DateTime<Utc>,
}
