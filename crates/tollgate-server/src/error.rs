use axum::Json;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::{Method, StatusCode, Uri};
use thiserror::Error;
use tollgate_auth::AuthError;
use tollgate_core::HttpError;
use tollgate_ledger::LedgerError;
use tollgate_proxy::ForwardError;

/// Any failure a gateway handler can report
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A path segment is not the number the route expects
    #[error("invalid {segment} '{value}': expected {expected}")]
    InvalidPath {
        segment: &'static str,
        value: String,
        expected: &'static str,
    },

    /// No route matches the request path
    #[error("no route for {path}")]
    RouteNotFound { path: String },

    /// The route exists but not for this method
    #[error("method {method} not allowed for {path}")]
    MethodNotAllowed { method: String, path: String },

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Forward(#[from] ForwardError),
}

impl HttpError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidPath { .. } => StatusCode::BAD_REQUEST,
            Self::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Ledger(e) => e.status_code(),
            Self::Auth(e) => e.status_code(),
            Self::Forward(e) => e.status_code(),
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::InvalidPath { .. } => "format_error",
            Self::RouteNotFound { .. } => "not_found_error",
            Self::MethodNotAllowed { .. } => "invalid_request_error",
            Self::Ledger(e) => e.error_type(),
            Self::Auth(e) => e.error_type(),
            Self::Forward(e) => e.error_type(),
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::InvalidPath { .. } | Self::RouteNotFound { .. } | Self::MethodNotAllowed { .. } => self.to_string(),
            Self::Ledger(e) => e.client_message(),
            Self::Auth(e) => e.client_message(),
            Self::Forward(e) => e.client_message(),
        }
    }
}

/// Marker extension on responses that carry the JSON error envelope
#[derive(Debug, Clone, Copy)]
pub struct ErrorEnvelope;

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = serde_json::json!({
            "error": {
                "type": self.error_type(),
                "message": self.client_message(),
            }
        });

        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(ErrorEnvelope);
        response
    }
}

/// Router fallback for unmatched paths
pub async fn route_not_found(uri: Uri) -> GatewayError {
    GatewayError::RouteNotFound {
        path: uri.path().to_owned(),
    }
}

/// Router fallback for a known path hit with the wrong method
pub async fn method_not_allowed(method: Method, uri: Uri) -> GatewayError {
    GatewayError::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_owned(),
    }
}

/// Rewrite error envelopes to status 200
///
/// For clients that only inspect the body to detect failures. Relayed
/// upstream responses keep their own status.
pub async fn uniform_status_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    if response.extensions().get::<ErrorEnvelope>().is_some() {
        *response.status_mut() = StatusCode::OK;
    }

    response
}
