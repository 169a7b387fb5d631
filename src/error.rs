//! Error types for the gallery

use thiserror::Error;

/// Result type alias for gallery operations
pub type Result<T> = std::result::Result<T, GalleryError>;

/// Errors that can occur while loading the gallery.
///
/// These ride inside iced messages, so the payloads are plain strings
/// rather than the underlying `reqwest`/`serde_json` errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GalleryError {
    /// The listing endpoint could not be reached or answered with a failure status
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// The response body was not the expected JSON
    #[error("Decode failed: {0}")]
    Decode(String),

    /// The configuration file could not be read or parsed
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for GalleryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GalleryError::Decode(err.to_string())
        } else {
            GalleryError::Fetch(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GalleryError {
    fn from(err: serde_json::Error) -> Self {
        GalleryError::Decode(err.to_string())
    }
}
