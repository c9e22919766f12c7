use crate::config::IntakeConfig;
use crate::models::StagedFile;
use crate::utils::validation::sanitize_filename;
use axum::extract::Multipart;
use bytes::Bytes;
use chrono::Utc;
use futures::{Stream, StreamExt, TryStreamExt};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("File too large: field '{field}' exceeds the limit of {limit} bytes")]
    FileTooLarge { field: String, limit: usize },

    #[error("Staging directory unavailable: {path}: {source}")]
    StagingUnavailable { path: PathBuf, source: io::Error },

    #[error("Malformed upload: {0}")]
    Malformed(String),

    #[error("I/O error during staging: {0}")]
    Io(#[from] io::Error),
}

/// Accepts multipart file parts, enforces the per-file size ceiling and stages
/// accepted parts under the configured directory. One instance per
/// configuration; requests share it without locking because every staged file
/// gets a unique generated name.
#[derive(Debug)]
pub struct IntakeService {
    config: IntakeConfig,
    staging_dir: PathBuf,
}

impl IntakeService {
    /// Prepare the staging directory and verify it is writable. Safe to call
    /// again for the same directory: existing staged files are left alone.
    pub async fn init(config: IntakeConfig) -> Result<Self, IntakeError> {
        if config.create_parent_path {
            fs::create_dir_all(&config.staging_dir).await.map_err(|e| {
                IntakeError::StagingUnavailable {
                    path: config.staging_dir.clone(),
                    source: e,
                }
            })?;
        }

        let meta = fs::metadata(&config.staging_dir).await.map_err(|e| {
            IntakeError::StagingUnavailable {
                path: config.staging_dir.clone(),
                source: e,
            }
        })?;
        if !meta.is_dir() {
            return Err(IntakeError::StagingUnavailable {
                path: config.staging_dir.clone(),
                source: io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
            });
        }

        // Probe writability up front rather than failing on the first upload
        let probe = config.staging_dir.join(format!(".probe-{}", Uuid::new_v4()));
        match fs::File::create(&probe).await {
            Ok(_) => {
                let _ = fs::remove_file(&probe).await;
            }
            Err(e) => {
                return Err(IntakeError::StagingUnavailable {
                    path: config.staging_dir.clone(),
                    source: e,
                });
            }
        }

        let staging_dir = fs::canonicalize(&config.staging_dir).await.map_err(|e| {
            IntakeError::StagingUnavailable {
                path: config.staging_dir.clone(),
                source: e,
            }
        })?;

        info!("📁 Staging directory ready: {}", staging_dir.display());

        Ok(Self {
            config,
            staging_dir,
        })
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Drain a multipart request, staging every file part in arrival order.
    /// All-or-nothing: any failure rolls back parts already staged for this
    /// request before the error is returned.
    pub async fn accept(&self, mut multipart: Multipart) -> Result<Vec<StagedFile>, IntakeError> {
        let mut staged: Vec<StagedFile> = Vec::new();

        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) => {
                    self.discard(&staged).await;
                    return Err(IntakeError::Malformed(e.to_string()));
                }
            };

            // Non-file fields carry no payload to stage
            let Some(file_name) = field.file_name().map(str::to_string) else {
                continue;
            };
            let field_name = field.name().unwrap_or_default().to_string();

            let stream = field.map_err(|e| IntakeError::Malformed(e.to_string()));
            match self.stage_part(&field_name, &file_name, stream).await {
                Ok(file) => staged.push(file),
                Err(e) => {
                    self.discard(&staged).await;
                    return Err(e);
                }
            }
        }

        Ok(staged)
    }

    /// Stream one part to a uniquely named file, counting bytes as they are
    /// written. Crossing the size ceiling stops the write and removes the
    /// partial file, so nothing past the limit ever persists.
    pub async fn stage_part<S>(
        &self,
        field_name: &str,
        original_filename: &str,
        mut stream: S,
    ) -> Result<StagedFile, IntakeError>
    where
        S: Stream<Item = Result<Bytes, IntakeError>> + Unpin,
    {
        let filename =
            sanitize_filename(original_filename).map_err(|e| IntakeError::Malformed(e.to_string()))?;

        let path = self.staging_dir.join(self.staged_name(&filename));
        let mut file = fs::File::create(&path).await?;
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    drop(file);
                    let _ = fs::remove_file(&path).await;
                    return Err(e);
                }
            };

            if written + chunk.len() as u64 > self.config.max_file_size as u64 {
                drop(file);
                let _ = fs::remove_file(&path).await;
                return Err(IntakeError::FileTooLarge {
                    field: field_name.to_string(),
                    limit: self.config.max_file_size,
                });
            }

            if let Err(e) = file.write_all(&chunk).await {
                drop(file);
                let _ = fs::remove_file(&path).await;
                return Err(e.into());
            }
            written += chunk.len() as u64;
        }

        if let Err(e) = file.flush().await {
            drop(file);
            let _ = fs::remove_file(&path).await;
            return Err(e.into());
        }

        Ok(StagedFile {
            path,
            original_filename: filename,
            size: written,
            field_name: field_name.to_string(),
            staged_at: Utc::now(),
        })
    }

    /// Best-effort rollback of already-staged parts
    pub async fn discard(&self, staged: &[StagedFile]) {
        for file in staged {
            if let Err(e) = fs::remove_file(&file.path).await {
                warn!("Failed to discard staged file {}: {}", file.path.display(), e);
            }
        }
    }

    fn staged_name(&self, filename: &str) -> String {
        let id = Uuid::new_v4();
        if self.config.preserve_extension {
            match Path::new(filename).extension().and_then(|e| e.to_str()) {
                Some(ext) if !ext.is_empty() => format!("{}.{}", id, ext),
                _ => id.to_string(),
            }
        } else {
            id.to_string()
        }
    }
}
