use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::models::LineId;

/// Errors surfaced by the host-facing parts of the crate.
///
/// Color selection and name composition never fail; these cover files, snapshots
/// and the write-back boundary.
#[derive(Debug, Error)]
pub enum LiveryError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    #[error("invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    #[error("line store still locked after {0:?}")]
    LockTimeout(Duration),

    #[error("unknown line {0}")]
    UnknownLine(LineId),
}

impl LiveryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, LiveryError>;
