use http::StatusCode;
use tollgate_core::HttpError;
use tollgate_store::StoreError;

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No usable `service-key` header on the request
    #[error("service-key header not found")]
    MissingCredential,

    /// The presented service key is not registered
    #[error("invalid service key")]
    InvalidCredential,

    /// Credential lookup failed
    #[error("credential lookup failed: {0}")]
    Store(#[from] StoreError),
}

impl HttpError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingCredential | Self::InvalidCredential => StatusCode::UNAUTHORIZED,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::MissingCredential | Self::InvalidCredential => "authentication_error",
            Self::Store(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Store(_) => "an internal error occurred".to_owned(),
            other => other.to_string(),
        }
    }
}
