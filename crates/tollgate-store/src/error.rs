use thiserror::Error;

/// Key-value store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not establish the backend connection
    #[error("store connection error: {0}")]
    Connect(String),

    /// A command failed or returned an unexpected reply
    #[error("store backend error: {0}")]
    Backend(String),
}
