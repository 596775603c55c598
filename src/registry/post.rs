//! POST handlers and their registry.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::http::HeaderMap;
use axum::response::Response;
use futures_util::future::BoxFuture;
use serde_json::Value;

/// A POST request after the body has been buffered and parsed.
#[derive(Debug, Clone)]
pub struct PostRequest {
    /// Normalized request path.
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Value,
}

/// A registered POST endpoint.
///
/// Implemented for any `Fn(PostRequest) -> impl Future<Output = Response>`, so plain
/// async closures can be registered directly.
pub trait PostHandler: Send + Sync + 'static {
    fn call(&self, request: PostRequest) -> BoxFuture<'static, Response>;
}

impl<F, Fut> PostHandler for F
where
    F: Fn(PostRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, request: PostRequest) -> BoxFuture<'static, Response> {
        Box::pin(self(request))
    }
}

/// Handler plus its access flag.
#[derive(Clone)]
pub struct PostRoute {
    pub uri: String,
    pub restricted: bool,
    handler: Arc<dyn PostHandler>,
}

impl PostRoute {
    pub async fn invoke(&self, request: PostRequest) -> Response {
        self.handler.call(request).await
    }
}

impl fmt::Debug for PostRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostRoute")
            .field("uri", &self.uri)
            .field("restricted", &self.restricted)
            .finish_non_exhaustive()
    }
}

/// Path -> handler map owned by one server instance.
#[derive(Debug, Default)]
pub struct PostRegistry {
    routes: HashMap<String, PostRoute>,
}

impl PostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a handler; a previous handler at the same path is replaced.
    pub fn register<H: PostHandler>(&mut self, uri: impl Into<String>, restricted: bool, handler: H) {
        let uri = uri.into();
        let route = PostRoute {
            uri: uri.clone(),
            restricted,
            handler: Arc::new(handler),
        };
        if self.routes.insert(uri.clone(), route).is_some() {
            tracing::debug!(uri = %uri, "POST handler replaced");
        }
    }

    pub fn lookup(&self, uri: &str) -> Option<&PostRoute> {
        self.routes.get(uri)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
