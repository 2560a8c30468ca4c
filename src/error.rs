//! Crate error type
//!
//! Game-over conditions are not errors; they are verdicts handled by the
//! session state machine. This covers the things that can actually fail:
//! storage, file intake, downloads and configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArcadeError {
    #[error("local storage is not available")]
    StorageUnavailable,

    #[error("storage operation failed: {0}")]
    Storage(String),

    #[error("unsupported file type {mime:?} (expected application/pdf)")]
    UnsupportedFileType { mime: String },

    #[error("compression level {0} out of range (10..=90)")]
    CompressionLevel(u8),

    #[error("canvas unavailable: {0}")]
    Canvas(String),

    #[error("download failed: {0}")]
    Download(String),

    #[error("unknown route {0:?}")]
    UnknownRoute(String),

    #[error("settings could not be (de)serialized: {0}")]
    Settings(#[from] serde_json::Error),
}
