use std::path::PathBuf;
use thiserror::Error;

/// Failures of the history file
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "{} is not a readable history file ({reason}); {}",
        .path.display(),
        describe_backup(.backup)
    )]
    Corrupt {
        path: PathBuf,
        backup: Option<PathBuf>,
        reason: String,
    },
    #[error("failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn describe_backup(backup: &Option<PathBuf>) -> String {
    match backup {
        Some(path) => format!("its contents were moved to {}", path.display()),
        None => "it could not be moved aside".to_string(),
    }
}
