use std::time::Instant;

use bytes::Bytes;
use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use http::StatusCode;
use secrecy::ExposeSecret;
use tollgate_config::UpstreamConfig;
use tollgate_telemetry::{Counter, Histogram, KeyValue, metrics};
use url::Url;

use crate::error::ForwardError;
use crate::payload::CompletionPayload;

/// Upstream reply relayed back to the caller
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    /// Headers needed to interpret the body (`content-type`, `content-encoding`)
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Relays prompts to the upstream completion API
#[derive(Clone)]
pub struct ProxyForwarder {
    http: reqwest::Client,
    url: Url,
    authorization: HeaderValue,
    model: String,
    temperature: f64,
    max_tokens: u32,
    metrics: ProxyMetrics,
}

#[derive(Clone)]
struct ProxyMetrics {
    requests: Counter<u64>,
    duration: Histogram<f64>,
}

impl ProxyMetrics {
    fn new() -> Self {
        let meter = metrics::meter();
        Self {
            requests: meter
                .u64_counter(metrics::PROXY_REQUEST_COUNT)
                .with_description("Requests relayed to the upstream API")
                .build(),
            duration: meter
                .f64_histogram(metrics::PROXY_UPSTREAM_DURATION)
                .with_description("Upstream round-trip time")
                .with_unit("s")
                .build(),
        }
    }

    fn record(&self, start: Instant, outcome: &str) {
        let attributes = [KeyValue::new("outcome", outcome.to_owned())];
        self.requests.add(1, &attributes);
        metrics::record_duration(&self.duration, start, &attributes);
    }
}

/// Inbound headers describing the client hop rather than the request itself
///
/// The HTTP client recomputes these for the upstream connection.
fn is_hop_header(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "host"
            | "content-length"
            | "transfer-encoding"
            | "connection"
            | "keep-alive"
            | "proxy-connection"
            | "te"
            | "trailer"
            | "upgrade"
    )
}

/// Upstream response headers copied back alongside the body
const RELAYED_RESPONSE_HEADERS: [HeaderName; 2] = [header::CONTENT_TYPE, header::CONTENT_ENCODING];

impl ProxyForwarder {
    /// Create from upstream configuration
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::Config`] if the timeout is malformed, the API
    /// key cannot be sent as a header, or the HTTP client cannot be built
    pub fn new(config: &UpstreamConfig) -> Result<Self, ForwardError> {
        let timeout = config.timeout().map_err(|e| ForwardError::Config(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ForwardError::Config(format!("failed to build HTTP client: {e}")))?;

        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", config.api_key.expose_secret()))
            .map_err(|_| ForwardError::Config("upstream API key is not a valid header value".to_owned()))?;
        authorization.set_sensitive(true);

        Ok(Self {
            http,
            url: config.url.clone(),
            authorization,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            metrics: ProxyMetrics::new(),
        })
    }

    /// Send `body` upstream as the prompt and return the upstream reply
    ///
    /// Inbound headers are copied except for hop headers; `Authorization`
    /// and `Content-Type` are replaced. Invalid UTF-8 in the body is
    /// replaced with U+FFFD.
    pub async fn forward(&self, body: &[u8], inbound: &HeaderMap) -> Result<UpstreamResponse, ForwardError> {
        let payload = CompletionPayload {
            prompt: String::from_utf8_lossy(body),
            model: &self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        let encoded = serde_json::to_vec(&payload)?;

        let request = self
            .http
            .post(self.url.clone())
            .headers(self.upstream_headers(inbound))
            .body(encoded)
            .build()
            .map_err(|e| ForwardError::BuildRequest(e.to_string()))?;

        let start = Instant::now();

        let response = match self.http.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                self.metrics.record(start, "transport_error");
                tracing::warn!(error = %e, timeout = e.is_timeout(), "upstream request failed");
                return Err(ForwardError::Send(e));
            }
        };

        let status = response.status();
        let mut headers = HeaderMap::new();
        for name in RELAYED_RESPONSE_HEADERS {
            if let Some(value) = response.headers().get(&name) {
                headers.insert(name, value.clone());
            }
        }

        let body = response.bytes().await.map_err(|e| {
            self.metrics.record(start, "read_error");
            ForwardError::ReadResponse(e)
        })?;

        self.metrics.record(start, status.as_str());
        tracing::info!(
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "upstream responded"
        );

        Ok(UpstreamResponse { status, headers, body })
    }

    fn upstream_headers(&self, inbound: &HeaderMap) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(inbound.len() + 2);

        for (name, value) in inbound {
            if !is_hop_header(name) {
                headers.append(name.clone(), value.clone());
            }
        }

        headers.insert(header::AUTHORIZATION, self.authorization.clone());
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }
}
