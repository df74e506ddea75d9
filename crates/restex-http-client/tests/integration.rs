//! Integration tests for restex-http-client using mockito
//!
//! Timing-sensitive cases (cancellation races, out-of-order completion) use
//! small hand-rolled TCP responders so delays are deterministic.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use restex_http_client::{
    CancelHandle, HttpClient, HttpError, Outcome, RequestInterceptor, RequestSummary,
};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;

fn client_for(server: &mockito::Server) -> HttpClient {
    HttpClient::builder()
        .base_url(Url::parse(&server.url()).expect("mock server url"))
        .build()
        .expect("client should build")
}

/// Accept one connection, wait, then answer 200 with the given JSON body.
async fn serve_once_delayed(body: &'static str, delay: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await;
            tokio::time::sleep(delay).await;
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
        }
    });

    format!("http://{}", addr)
}

/// Accept one connection and never answer it.
async fn serve_never() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await;
            // Hold the connection open without responding.
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
    });

    format!("http://{}", addr)
}

// === Success settlement ===

#[tokio::test]
async fn test_get_success_echoes_request_summary() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/todos")
        .match_query(mockito::Matcher::UrlEncoded(
            "_limit".into(),
            "5".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id": 1, "title": "delectus aut autem"}]"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let response = client
        .get("/todos")
        .query("_limit", "5")
        .send()
        .await
        .expect("GET should succeed");

    assert_eq!(response.status(), 200);
    assert!(response.is_success());
    assert_eq!(
        response.headers().get("content-type").map(String::as_str),
        Some("application/json")
    );
    assert_eq!(response.body()[0]["id"], json!(1));

    let summary = response.request();
    assert_eq!(summary.method, "GET");
    assert!(summary.url.ends_with("/todos"));
    assert_eq!(summary.query, vec![("_limit".to_string(), "5".to_string())]);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/todos")
        .match_body(mockito::Matcher::Json(json!({
            "title": "New Todo",
            "completed": false
        })))
        .with_status(201)
        .with_body(r#"{"id": 201, "title": "New Todo", "completed": false}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let response = client
        .post("/todos")
        .json(&json!({"title": "New Todo", "completed": false}))
        .send()
        .await
        .expect("POST should succeed");

    assert_eq!(response.status(), 201);
    assert_eq!(response.body()["id"], json!(201));
    assert_eq!(
        response.request().body.as_ref().map(|b| b["title"].clone()),
        Some(json!("New Todo"))
    );

    mock.assert_async().await;
}

#[tokio::test]
async fn test_put_and_patch_hit_fixed_resource() {
    let mut server = mockito::Server::new_async().await;

    let put_mock = server
        .mock("PUT", "/todos/1")
        .with_status(200)
        .with_body(r#"{"id": 1}"#)
        .create_async()
        .await;
    let patch_mock = server
        .mock("PATCH", "/todos/1")
        .with_status(200)
        .with_body(r#"{"id": 1}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    client
        .put("/todos/1")
        .json(&json!({"title": "Updated", "completed": true}))
        .send()
        .await
        .expect("PUT should succeed");
    client
        .patch("/todos/1")
        .json(&json!({"title": "Updated"}))
        .send()
        .await
        .expect("PATCH should succeed");

    put_mock.assert_async().await;
    patch_mock.assert_async().await;
}

#[tokio::test]
async fn test_delete_settles_success() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("DELETE", "/todos/1")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let client = client_for(&server);
    let response = client
        .delete("/todos/1")
        .send()
        .await
        .expect("DELETE should succeed");
    assert_eq!(response.body(), &json!({}));

    mock.assert_async().await;
}

// === Header merging ===

#[tokio::test]
async fn test_default_headers_sent_with_every_request() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/todos")
        .match_header("x-auth-token", "someOtherTokenValue")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let client = HttpClient::builder()
        .base_url(Url::parse(&server.url()).expect("mock server url"))
        .default_header("X-Auth-Token", "someOtherTokenValue")
        .build()
        .expect("client should build");

    client.get("/todos").send().await.expect("GET should succeed");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_request_header_wins_over_default_on_collision() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/todos")
        .match_header("x-auth-token", "per-request-token")
        .match_header("content-type", "application/json")
        .with_status(201)
        .with_body("{}")
        .create_async()
        .await;

    let client = HttpClient::builder()
        .base_url(Url::parse(&server.url()).expect("mock server url"))
        .default_header("X-Auth-Token", "default-token")
        .build()
        .expect("client should build");

    let response = client
        .post("/todos")
        .header("X-Auth-Token", "per-request-token")
        .json(&json!({"title": "t"}))
        .send()
        .await
        .expect("POST should succeed");

    // The echoed config shows the merged result the wire saw.
    assert_eq!(
        response.request().headers.get("X-Auth-Token").map(String::as_str),
        Some("per-request-token")
    );

    mock.assert_async().await;
}

// === Transform chain ===

#[tokio::test]
async fn test_request_transform_runs_after_default_parse_exactly_once() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/todos")
        .with_status(201)
        .with_body(r#"{"title": "oh hey there bud"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let response = client
        .post("/todos")
        .json(&json!({"title": "oh hey there bud"}))
        .transform(|mut body| {
            // Appending is not idempotent; a double application would show
            // up as a double suffix.
            if let Some(title) = body.get_mut("title") {
                let upper = title.as_str().unwrap_or_default().to_uppercase();
                *title = Value::String(format!("{}.", upper));
            }
            body
        })
        .send()
        .await
        .expect("POST should succeed");

    assert_eq!(response.body()["title"], json!("OH HEY THERE BUD."));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_client_transforms_run_before_request_transforms() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/todos")
        .with_status(200)
        .with_body(r#""x""#)
        .create_async()
        .await;

    let client = HttpClient::builder()
        .base_url(Url::parse(&server.url()).expect("mock server url"))
        .transform(|value| Value::String(format!("{}-default", value.as_str().unwrap_or_default())))
        .build()
        .expect("client should build");

    let response = client
        .get("/todos")
        .transform(|value| Value::String(format!("{}-custom", value.as_str().unwrap_or_default())))
        .send()
        .await
        .expect("GET should succeed");

    assert_eq!(response.body(), &json!("x-default-custom"));
}

// === Error taxonomy ===

#[tokio::test]
async fn test_missing_resource_classified_as_status() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/todosssss")
        .match_query(mockito::Matcher::UrlEncoded(
            "_limit".into(),
            "5".into(),
        ))
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create_async()
        .await;

    let client = client_for(&server);
    let result = client.get("/todosssss").query("_limit", "5").send().await;

    match result {
        Err(HttpError::Status {
            status,
            headers,
            body,
        }) => {
            assert_eq!(status, 404);
            assert_eq!(
                headers.get("content-type").map(String::as_str),
                Some("application/json")
            );
            assert_eq!(body, json!({}));
        }
        other => panic!("Expected HttpError::Status, got {:?}", other),
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn test_connection_refused_classified_as_no_response() {
    // Bind then drop so the port is known-dead.
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let client = HttpClient::builder()
        .base_url(Url::parse(&format!("http://{}", addr)).expect("valid url"))
        .build()
        .expect("client should build");

    let result = client.get("/todos").send().await;

    match result {
        Err(HttpError::NoResponse { request, detail }) => {
            assert_eq!(request.method, "GET");
            assert!(request.url.ends_with("/todos"));
            assert!(!detail.is_empty());
        }
        other => panic!("Expected HttpError::NoResponse, got {:?}", other),
    }
}

#[tokio::test]
async fn test_timeout_classified_as_no_response() {
    let url = serve_once_delayed("[]", Duration::from_millis(500)).await;

    let client = HttpClient::builder()
        .base_url(Url::parse(&url).expect("valid url"))
        .build()
        .expect("client should build");

    let result = client
        .get("/todos")
        .timeout(Duration::from_millis(50))
        .send()
        .await;

    assert!(matches!(result, Err(HttpError::NoResponse { .. })));
}

// === Concurrent dual fetch ===

#[tokio::test]
async fn test_batch_issues_both_before_awaiting_either() {
    // First endpoint answers late, second immediately. Both must be in
    // flight at once and the join must see the out-of-order completion.
    let todos_url = serve_once_delayed(r#"[{"id": 1}]"#, Duration::from_millis(300)).await;
    let posts_url = serve_once_delayed(r#"[{"id": 100}]"#, Duration::from_millis(0)).await;

    let client = HttpClient::new();
    let completion_order: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

    let todos_fut = {
        let order = completion_order.clone();
        let request = client.get(&format!("{}/todos", todos_url));
        async move {
            let result = request.send().await;
            order.lock().expect("order lock").push("todos");
            result
        }
    };
    let posts_fut = {
        let order = completion_order.clone();
        let request = client.get(&format!("{}/posts", posts_url));
        async move {
            let result = request.send().await;
            order.lock().expect("order lock").push("posts");
            result
        }
    };

    let started = std::time::Instant::now();
    let (todos, posts) = futures::join!(todos_fut, posts_fut);
    let elapsed = started.elapsed();

    let todos = todos.expect("todos fetch should succeed");
    let posts = posts.expect("posts fetch should succeed");
    assert_eq!(todos.body()[0]["id"], json!(1));
    assert_eq!(posts.body()[0]["id"], json!(100));

    // The fast endpoint settled first even though it was issued second, and
    // the combined wait is bounded by the slow endpoint, not the sum.
    let order = completion_order.lock().expect("order lock");
    assert_eq!(*order, vec!["posts", "todos"]);
    assert!(
        elapsed < Duration::from_millis(550),
        "fetches did not overlap: {:?}",
        elapsed
    );
}

// === Cancellation ===

#[tokio::test]
async fn test_cancel_signal_wins_while_request_in_flight() {
    let url = serve_never().await;

    let client = HttpClient::builder()
        .base_url(Url::parse(&url).expect("valid url"))
        .build()
        .expect("client should build");

    let handle = CancelHandle::new();
    let request = client.get("/todos").cancel_handle(&handle);
    let task = tokio::spawn(request.outcome());

    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.cancel("I canceled it");

    match task.await.expect("task should not panic") {
        Outcome::Cancelled(reason) => assert_eq!(reason, "I canceled it"),
        other => panic!("Expected Outcome::Cancelled, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cancel_before_dispatch_sends_nothing() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/todos")
        .with_status(200)
        .with_body("[]")
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let handle = CancelHandle::new();
    handle.cancel("cancelled up front");

    let outcome = client.get("/todos").cancel_handle(&handle).outcome().await;

    assert!(matches!(outcome, Outcome::Cancelled(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_cancel_after_settlement_has_no_effect() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/todos")
        .with_status(200)
        .with_body(r#"[{"id": 1}]"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let handle = CancelHandle::new();

    let response = client
        .get("/todos")
        .cancel_handle(&handle)
        .send()
        .await
        .expect("response should settle before any cancel");

    // The request has settled; this signal must change nothing.
    handle.cancel("too late");
    assert_eq!(response.status(), 200);
    assert_eq!(response.body()[0]["id"], json!(1));

    mock.assert_async().await;
}

// === Interceptors ===

struct RejectingInterceptor;

#[async_trait]
impl RequestInterceptor for RejectingInterceptor {
    async fn before_send(&self, _request: &mut RequestSummary) -> Result<(), HttpError> {
        Err(HttpError::Setup("rejected by interceptor".to_string()))
    }
}

struct HeaderInjectingInterceptor;

#[async_trait]
impl RequestInterceptor for HeaderInjectingInterceptor {
    async fn before_send(&self, request: &mut RequestSummary) -> Result<(), HttpError> {
        request
            .headers
            .insert("X-Intercepted".to_string(), "yes".to_string());
        Ok(())
    }
}

#[tokio::test]
async fn test_interceptor_rejection_aborts_before_send() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/todos")
        .with_status(200)
        .with_body("[]")
        .expect(0)
        .create_async()
        .await;

    let client = HttpClient::builder()
        .base_url(Url::parse(&server.url()).expect("mock server url"))
        .interceptor(RejectingInterceptor)
        .build()
        .expect("client should build");

    let result = client.get("/todos").send().await;

    match result {
        Err(HttpError::Setup(msg)) => assert_eq!(msg, "rejected by interceptor"),
        other => panic!("Expected HttpError::Setup, got {:?}", other),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_interceptor_mutation_reaches_the_wire() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/todos")
        .match_header("x-intercepted", "yes")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let client = HttpClient::builder()
        .base_url(Url::parse(&server.url()).expect("mock server url"))
        .interceptor(HeaderInjectingInterceptor)
        .build()
        .expect("client should build");

    client.get("/todos").send().await.expect("GET should succeed");

    mock.assert_async().await;
}
