//! Request dispatch through the frozen router.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use asset_host::assets::ContentType;
use asset_host::http::response;
use asset_host::registry::{PostHandler, PostRequest, Resource};
use asset_host::security::{CredentialError, CredentialRecord, CredentialStore, MemoryCredentialStore};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use futures_util::future::BoxFuture;
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, common::token_cookie(token))
        .body(Body::empty())
        .unwrap()
}

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn body_of(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

/// A POST handler echoing the body and counting its invocations.
fn counting_echo(calls: Arc<AtomicUsize>) -> impl PostHandler {
    move |req: PostRequest| {
        calls.fetch_add(1, Ordering::SeqCst);
        std::future::ready(response::json(&json!({ "echo": req.body, "uri": req.uri })))
    }
}

/// Credential store counting how often it is asked.
struct CountingStore {
    inner: MemoryCredentialStore,
    lookups: AtomicUsize,
}

impl CountingStore {
    fn with_token(token: &str) -> Arc<Self> {
        let inner = MemoryCredentialStore::new(["token"]);
        inner.insert(json!({ "token": token }).as_object().cloned().unwrap());
        Arc::new(Self {
            inner,
            lookups: AtomicUsize::new(0),
        })
    }

    fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl CredentialStore for CountingStore {
    fn has_field(&self, field: &str) -> bool {
        self.inner.has_field(field)
    }

    fn find_by_field<'a>(
        &'a self,
        field: &'a str,
        value: &'a str,
    ) -> BoxFuture<'a, Result<Option<CredentialRecord>, CredentialError>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_field(field, value)
    }
}

#[tokio::test]
async fn test_registered_resource_is_served() {
    let (_dir, mut server) = common::server();
    server.register(Resource::new("/hello", "<p>hi</p>"));
    let app = server.into_router();

    let res = send(&app, get("/hello")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "text/html; charset=utf-8");
    assert!(res.headers().get(header::CONTENT_ENCODING).is_none());
    assert!(res.headers().get(header::CACHE_CONTROL).is_none());
    assert_eq!(body_of(res).await, b"<p>hi</p>");
}

#[tokio::test]
async fn test_cached_compressed_resource() {
    let (_dir, mut server) = common::server();
    server.register(
        Resource::new("/hello", "hi")
            .with_content_type(ContentType::Css)
            .cache_seconds(300)
            .compressed(true),
    );
    let app = server.into_router();

    let res = send(&app, get("/hello")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "text/css; charset=utf-8");
    assert_eq!(res.headers()[header::CACHE_CONTROL], "max-age=300");
    assert_eq!(res.headers()[header::CONTENT_ENCODING], "gzip");
    assert_eq!(common::gunzip(&body_of(res).await), b"hi");
}

#[tokio::test]
async fn test_query_and_dot_segments_are_ignored() {
    let (_dir, mut server) = common::server();
    server.register(Resource::new("/a/b", "ab"));
    let app = server.into_router();

    for uri in ["/a/b?x=1", "/a/./b", "/a/c/../b"] {
        let res = send(&app, get(uri)).await;
        assert_eq!(res.status(), StatusCode::OK, "{}", uri);
        assert_eq!(body_of(res).await, b"ab");
    }
}

#[tokio::test]
async fn test_last_registration_wins() {
    let (_dir, mut server) = common::server();
    server.register(Resource::new("/x", "first"));
    server.register(Resource::new("/x", "second"));
    let app = server.into_router();

    let res = send(&app, get("/x")).await;
    assert_eq!(body_of(res).await, b"second");
}

#[tokio::test]
async fn test_not_found_default_body() {
    let (_dir, server) = common::server();
    let app = server.into_router();

    let res = send(&app, get("/missing")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.headers()[header::CACHE_CONTROL], "max-age=604800");
    assert_eq!(body_of(res).await, response::NOT_FOUND_BODY.as_bytes());
}

#[tokio::test]
async fn test_not_found_fallback_file() {
    let (dir, mut server) = common::server();
    let page = dir.path().join("404.html");
    std::fs::write(&page, "<h1>lost</h1>").unwrap();
    server.extra(None, Some(&page)).unwrap();
    let app = server.into_router();

    let res = send(&app, get("/missing")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_of(res).await, b"<h1>lost</h1>");
}

#[tokio::test]
async fn test_unreadable_fallback_keeps_login_uri() {
    let (dir, mut server) = common::server();
    let result = server.extra(Some("/signin".into()), Some(&dir.path().join("nope.html")));
    assert!(result.is_err());
    server.register(Resource::new("/secret", "s").restricted(true));
    let app = server.into_router();

    let res = send(&app, get("/secret")).await;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers()[header::LOCATION], "/signin");

    let res = send(&app, get("/missing")).await;
    assert_eq!(body_of(res).await, response::NOT_FOUND_BODY.as_bytes());
}

#[tokio::test]
async fn test_restricted_resource_requires_token() {
    let (_dir, mut server) = common::secured_server();
    server.register(Resource::new("/private", "secret").restricted(true));
    let app = server.into_router();

    let res = send(&app, get("/private")).await;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers()[header::LOCATION], "/login");

    let res = send(&app, get_with_token("/private", "wrong")).await;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);

    let res = send(&app, get_with_token("/private", common::VALID_TOKEN)).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_of(res).await, b"secret");
}

#[tokio::test]
async fn test_restricted_resource_without_security_is_unreachable() {
    let (_dir, mut server) = common::server();
    server.register(Resource::new("/private", "secret").restricted(true));
    let app = server.into_router();

    let res = send(&app, get_with_token("/private", common::VALID_TOKEN)).await;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn test_public_resource_ignores_bad_token() {
    let (_dir, mut server) = common::secured_server();
    server.register(Resource::new("/open", "open"));
    let app = server.into_router();

    let res = send(&app, get_with_token("/open", "garbage")).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_store_consulted_only_for_restricted_targets() {
    let (_dir, mut server) = common::server();
    let store = CountingStore::with_token(common::VALID_TOKEN);
    server.secure(store.clone(), "token").unwrap();
    server.register(Resource::new("/open", "open"));
    server.register(Resource::new("/private", "secret").restricted(true));
    let calls = Arc::new(AtomicUsize::new(0));
    server.post_restricted("/api/admin", counting_echo(calls.clone()));
    let app = server.into_router();

    let res = send(&app, get_with_token("/open", common::VALID_TOKEN)).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(store.lookups(), 0);

    let res = send(&app, get_with_token("/missing", common::VALID_TOKEN)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(store.lookups(), 0);

    let res = send(&app, get_with_token("/private", common::VALID_TOKEN)).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(store.lookups(), 1);

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/admin")
        .header(header::COOKIE, common::token_cookie(common::VALID_TOKEN))
        .body(Body::from("{}"))
        .unwrap();
    let res = send(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(store.lookups(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unsupported_methods() {
    let (_dir, mut server) = common::server();
    server.register(Resource::new("/hello", "hi"));
    let app = server.into_router();

    for method in [Method::PUT, Method::DELETE, Method::PATCH, Method::HEAD] {
        let req = Request::builder()
            .method(method.clone())
            .uri("/hello")
            .body(Body::from("ignored"))
            .unwrap();
        let res = send(&app, req).await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED, "{}", method);
        assert_eq!(res.headers()[header::ACCEPT], response::ALLOWED_METHODS);
    }
}

#[tokio::test]
async fn test_post_handler_invoked_once() {
    let (_dir, mut server) = common::server();
    let calls = Arc::new(AtomicUsize::new(0));
    server.post("/api/echo", counting_echo(calls.clone()));
    let app = server.into_router();

    let res = send(&app, post("/api/echo?debug=1", r#"{"n": 7}"#)).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(res.headers()[header::CONTENT_ENCODING], "gzip");

    let value: Value = serde_json::from_slice(&common::gunzip(&body_of(res).await)).unwrap();
    assert_eq!(value, json!({ "echo": { "n": 7 }, "uri": "/api/echo" }));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_post_handler_sees_headers() {
    let (_dir, mut server) = common::server();
    server.post("/api/whoami", |req: PostRequest| async move {
        let agent = req
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        response::json(&json!({ "agent": agent }))
    });
    let app = server.into_router();

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/whoami")
        .header(header::USER_AGENT, "tester")
        .body(Body::from("{}"))
        .unwrap();
    let res = send(&app, req).await;
    let value: Value = serde_json::from_slice(&common::gunzip(&body_of(res).await)).unwrap();
    assert_eq!(value["agent"], "tester");
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let (_dir, mut server) = common::server();
    let calls = Arc::new(AtomicUsize::new(0));
    server.post("/api/echo", counting_echo(calls.clone()));
    let app = server.into_router();

    for body in ["{not json", ""] {
        let res = send(&app, post("/api/echo", body)).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{:?}", body);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_post_target() {
    let (_dir, mut server) = common::server();
    server.register(Resource::new("/hello", "hi"));
    let app = server.into_router();

    let res = send(&app, post("/hello", "{}")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().get(header::CACHE_CONTROL).is_none());
    assert!(body_of(res).await.is_empty());
}

#[tokio::test]
async fn test_restricted_post_requires_token() {
    let (_dir, mut server) = common::secured_server();
    let calls = Arc::new(AtomicUsize::new(0));
    server.post_restricted("/api/admin", counting_echo(calls.clone()));
    let app = server.into_router();

    let res = send(&app, post("/api/admin", "{}")).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_of(res).await, response::SECURED_BODY.as_bytes());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/admin")
        .header(header::COOKIE, common::token_cookie(common::VALID_TOKEN))
        .body(Body::from("{}"))
        .unwrap();
    let res = send(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let (_dir, mut server) = common::server_with(|options| options.max_body_size = 16);
    let calls = Arc::new(AtomicUsize::new(0));
    server.post("/api/echo", counting_echo(calls.clone()));
    let app = server.into_router();

    let big = format!(r#"{{"pad": "{}"}}"#, "x".repeat(64));
    let res = send(&app, post("/api/echo", big)).await;
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let (_dir, mut server) = common::server();
    server.register(Resource::new("/hello", "hi"));
    let app = server.into_router();

    let res = send(&app, get("/hello")).await;
    assert!(res.headers().contains_key("x-request-id"));

    let req = Request::builder()
        .uri("/hello")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();
    let res = send(&app, req).await;
    assert_eq!(res.headers()["x-request-id"], "abc-123");
}
