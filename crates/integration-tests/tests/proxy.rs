mod harness;

use axum::http::StatusCode;
use harness::config::ConfigBuilder;
use harness::mock_upstream::MockUpstream;
use harness::server::TestServer;
use serde_json::Value;

async fn start_with_key(upstream: &MockUpstream) -> TestServer {
    let server = TestServer::start(ConfigBuilder::new(&upstream.url()).build()).await.unwrap();
    server.add_service_key("abc").await;
    server
}

#[tokio::test]
async fn missing_service_key_is_rejected() {
    let upstream = MockUpstream::start().await.unwrap();
    let server = start_with_key(&upstream).await;

    let resp = server.client().post(server.url("/chatgpt")).body("hi").send().await.unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["type"], "authentication_error");
    assert_eq!(body["error"]["message"], "service-key header not found");
    assert!(upstream.received().is_empty());
}

#[tokio::test]
async fn unknown_service_key_is_rejected() {
    let upstream = MockUpstream::start().await.unwrap();
    let server = start_with_key(&upstream).await;

    let resp = server
        .client()
        .post(server.url("/chatgpt"))
        .header("service-key", "nope")
        .body("hi")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["type"], "authentication_error");
    assert!(upstream.received().is_empty());
}

#[tokio::test]
async fn relays_prompt_and_returns_upstream_reply() {
    let upstream = MockUpstream::start().await.unwrap();
    let server = start_with_key(&upstream).await;

    let resp = server
        .client()
        .post(server.url("/chatgpt"))
        .header("service-key", "abc")
        .header("authorization", "Bearer caller-token")
        .header("x-request-id", "req-1")
        .body("ping")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "application/json");
    assert_eq!(resp.text().await.unwrap(), r#"{"id":"cmpl-1","choices":[{"text":"pong"}]}"#);

    let received = upstream.received();
    assert_eq!(received.len(), 1);
    let sent = &received[0];

    assert_eq!(
        sent.json(),
        serde_json::json!({
            "prompt": "ping",
            "model": "gpt-3.5-turbo",
            "temperature": 1.0,
            "max_tokens": 100
        })
    );
    assert_eq!(sent.headers["authorization"], "Bearer upstream-secret");
    assert_eq!(sent.headers["content-type"], "application/json");
    assert_eq!(sent.headers["x-request-id"], "req-1");
    assert_eq!(sent.headers["service-key"], "abc");
}

#[tokio::test]
async fn any_method_is_relayed_as_post() {
    let upstream = MockUpstream::start().await.unwrap();
    let server = start_with_key(&upstream).await;

    let resp = server
        .client()
        .get(server.url("/chatgpt"))
        .header("service-key", "abc")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let received = upstream.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].json()["prompt"], "");
}

#[tokio::test]
async fn upstream_errors_are_relayed_verbatim() {
    let upstream_body = r#"{"error":{"message":"Rate limit reached"}}"#;
    let upstream = MockUpstream::start_with(StatusCode::TOO_MANY_REQUESTS, upstream_body)
        .await
        .unwrap();
    let config = ConfigBuilder::new(&upstream.url()).with_uniform_error_status().build();
    let server = TestServer::start(config).await.unwrap();
    server.add_service_key("abc").await;

    let resp = server
        .client()
        .post(server.url("/chatgpt"))
        .header("service-key", "abc")
        .body("hello")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 429);
    assert_eq!(resp.text().await.unwrap(), upstream_body);
}

#[tokio::test]
async fn unreachable_upstream_is_bad_gateway() {
    let config = ConfigBuilder::new("http://127.0.0.1:1/v1/completions")
        .with_upstream_timeout("2s")
        .build();
    let server = TestServer::start(config).await.unwrap();
    server.add_service_key("abc").await;

    let resp = server
        .client()
        .post(server.url("/chatgpt"))
        .header("service-key", "abc")
        .body("hello")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 502);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["type"], "upstream_error");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let upstream = MockUpstream::start().await.unwrap();
    let config = ConfigBuilder::new(&upstream.url()).with_max_body_bytes(16).build();
    let server = TestServer::start(config).await.unwrap();
    server.add_service_key("abc").await;

    let resp = server
        .client()
        .post(server.url("/chatgpt"))
        .header("service-key", "abc")
        .body("x".repeat(64))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["type"], "invalid_request_error");
    assert!(upstream.received().is_empty());
}
