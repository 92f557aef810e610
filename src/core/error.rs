use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the bootstrapper.
/// Every module returns `Result<T, BootstrapError>`; only
/// `ManifestLoad` is allowed to end the process.
#[derive(Debug, Error)]
pub enum BootstrapError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    // ── Integrity ───────────────────────────────────────
    #[error("SHA-1 mismatch for {path:?}: expected {expected}, got {actual}")]
    Sha1Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    // ── Manifest ────────────────────────────────────────
    #[error("Cannot load manifest {path:?}: {reason}")]
    ManifestLoad { path: PathBuf, reason: String },

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Archive ─────────────────────────────────────────
    #[error("Zip extraction error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type BootstrapResult<T> = Result<T, BootstrapError>;

impl From<std::io::Error> for BootstrapError {
    fn from(source: std::io::Error) -> Self {
        BootstrapError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

impl BootstrapError {
    /// Attach a path to an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BootstrapError::Io {
            path: path.into(),
            source,
        }
    }
}
