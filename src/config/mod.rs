use std::env;
use std::path::PathBuf;

/// Intake configuration for file uploads
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Maximum file size in bytes (default: 5 MB)
    pub max_file_size: usize,

    /// Staging directory for accepted uploads (default: "public/temp")
    pub staging_dir: PathBuf,

    /// Staged filename keeps the original extension (default: true)
    pub preserve_extension: bool,

    /// Create missing intermediate directories on demand (default: true)
    pub create_parent_path: bool,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_file_size: 5 * 1024 * 1024, // 5 MB
            staging_dir: PathBuf::from("public/temp"),
            preserve_extension: true,
            create_parent_path: true,
        }
    }
}

impl IntakeConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            max_file_size: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),

            staging_dir: env::var("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.staging_dir),

            preserve_extension: env::var("PRESERVE_EXTENSION")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(default.preserve_extension),

            create_parent_path: env::var("CREATE_PARENT_PATH")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(default.create_parent_path),
        }
    }

    /// Create config for development and tests (staging dir supplied by the caller)
    pub fn development(staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            max_file_size: 5 * 1024 * 1024,
            staging_dir: staging_dir.into(),
            preserve_extension: true,
            create_parent_path: true,
        }
    }
}
