use std::path::PathBuf;
use thiserror::Error;

pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
    #[error("schema initialization failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("configuration error: {0}")]
    Config(String),
}

impl SyncError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Io {
            path: path.into(),
            source,
        }
    }

    /// Converts a csv reader error into an I/O failure for `path`.
    pub fn from_csv(path: impl Into<PathBuf>, err: csv::Error) -> Self {
        let source = match err.into_kind() {
            csv::ErrorKind::Io(io_err) => io_err,
            other => std::io::Error::new(std::io::ErrorKind::InvalidData, format!("{other:?}")),
        };
        SyncError::io(path, source)
    }

    /// True for failures raised by the database layer.
    pub fn is_storage(&self) -> bool {
        matches!(self, SyncError::Storage(_) | SyncError::Migration(_))
    }
}
