//! Chat collaborator errors.

/// Result type for chat operations.
pub type Result<T> = std::result::Result<T, ChatError>;

/// Errors raised by a chat client.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform answered but refused the call
    #[error("{method} failed: {error}")]
    Api {
        /// API method called
        method: String,
        /// Error code returned by the platform
        error: String,
    },
}

impl ChatError {
    /// Build an API error.
    pub fn api(method: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Api {
            method: method.into(),
            error: error.into(),
        }
    }
}
