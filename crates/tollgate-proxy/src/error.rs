use http::StatusCode;
use thiserror::Error;
use tollgate_core::HttpError;

/// Failures while relaying a request upstream
///
/// Each stage has its own variant so logs show where a relay broke. None
/// of them is retried.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// Forwarder could not be built from configuration
    #[error("proxy configuration error: {0}")]
    Config(String),

    /// Inbound request body could not be read
    #[error("error reading request body: {0}")]
    ReadBody(String),

    /// Upstream payload could not be encoded
    #[error("error creating request payload: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Upstream request could not be assembled
    #[error("error creating API request: {0}")]
    BuildRequest(String),

    /// Upstream could not be reached or did not answer in time
    #[error("error sending API request: {0}")]
    Send(#[source] reqwest::Error),

    /// Upstream response body could not be read
    #[error("error reading API response: {0}")]
    ReadResponse(#[source] reqwest::Error),

    /// Upstream response could not be relayed to the caller
    #[error("error writing response: {0}")]
    WriteResponse(String),
}

impl HttpError for ForwardError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Send(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            Self::Send(_) | Self::ReadResponse(_) => StatusCode::BAD_GATEWAY,
            Self::ReadBody(_) => StatusCode::BAD_REQUEST,
            Self::Config(_) | Self::Serialize(_) | Self::BuildRequest(_) | Self::WriteResponse(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Send(_) | Self::ReadResponse(_) => "upstream_error",
            Self::ReadBody(_) => "invalid_request_error",
            Self::Config(_) | Self::Serialize(_) | Self::BuildRequest(_) | Self::WriteResponse(_) => {
                "internal_error"
            }
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Send(e) if e.is_timeout() => "upstream API timed out".to_owned(),
            Self::Send(_) => "error sending API request".to_owned(),
            Self::ReadResponse(_) => "error reading API response".to_owned(),
            Self::ReadBody(_) => "error reading request body".to_owned(),
            Self::Config(_) | Self::Serialize(_) | Self::BuildRequest(_) | Self::WriteResponse(_) => {
                "an internal error occurred".to_owned()
            }
        }
    }
}
