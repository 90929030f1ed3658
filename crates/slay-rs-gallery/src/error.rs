//! Error types for gallery operations.

/// Errors returned by the record log.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GalleryError {
    /// Malformed or missing payload.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
