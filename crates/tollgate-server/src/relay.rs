use axum::body::Body;
use axum::extract::{Request, State};
use axum::response::Response;
use tollgate_proxy::ForwardError;

use crate::error::GatewayError;
use crate::state::GatewayState;

/// `/chatgpt`: check the service key, then relay the body upstream
///
/// The upstream status and body come back unchanged, errors included.
pub async fn relay_completion(State(state): State<GatewayState>, request: Request) -> Result<Response, GatewayError> {
    let (parts, body) = request.into_parts();

    state.gate.authorize(&parts.headers).await?;

    let body = axum::body::to_bytes(body, state.max_body_bytes)
        .await
        .map_err(|e| ForwardError::ReadBody(e.to_string()))?;

    let upstream = state.forwarder.forward(&body, &parts.headers).await?;

    let mut builder = http::Response::builder().status(upstream.status);
    if let Some(headers) = builder.headers_mut() {
        headers.extend(upstream.headers);
    }

    builder
        .body(Body::from(upstream.body))
        .map_err(|e| ForwardError::WriteResponse(e.to_string()).into())
}
