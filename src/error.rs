//! Error types for word2pic

use thiserror::Error;

/// Result type alias for word2pic operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering, exporting or talking to the provider
#[derive(Error, Debug)]
pub enum Error {
    /// Text was empty or whitespace only
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Failed to lay out or paint content
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Failed to encode the raster surface
    #[error("Image encoding failed: {0}")]
    EncodeError(String),

    /// Transport-level failure talking to the provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Provider answered with a non-success status
    #[error("API request failed with status {status}")]
    ApiError { status: u16 },

    /// Provider answered 2xx but the body did not have the expected shape
    #[error("Malformed API response: {0}")]
    MalformedResponse(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Failed to read or write persisted state
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Failed to save or copy an image
    #[error("Export failed: {0}")]
    ExportError(String),

    /// Control is cooling down after a failed call
    #[error("'{control}' is cooling down for another {remaining_ms}ms")]
    Cooldown { control: String, remaining_ms: u64 },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Failures of the remote provider, shown to the user as the same alert
    pub fn is_remote_failure(&self) -> bool {
        matches!(
            self,
            Error::NetworkError(_) | Error::ApiError { .. } | Error::MalformedResponse(_)
        )
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::EncodeError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::StorageError(err.to_string())
    }
}
