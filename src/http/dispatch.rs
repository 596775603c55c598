//! Per-request dispatch.
//!
//! ```text
//! request
//!     → classifier (method)
//!     → GET:  normalize → ResourceRegistry → [restricted? gate] → page | 404 | 307
//!     → POST: normalize → PostRegistry → [restricted? gate] → buffer + parse → handler
//!                                                           | 404 | 401 | 413 | 400
//!     → 405 for everything else
//! ```
//!
//! The gate is consulted only when the matched target is restricted, and at most
//! once per request.

use std::sync::Arc;
use std::time::Instant;

use axum::body::{to_bytes, Body, Bytes};
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::response::Response;

use crate::http::classifier::RequestKind;
use crate::http::request::{extract_token, normalize_path, X_REQUEST_ID};
use crate::http::response;
use crate::observability::metrics;
use crate::registry::{PostRegistry, PostRequest, ResourceRegistry};
use crate::security::SecurityGate;

/// Settings outside the registries that shape replies.
#[derive(Debug, Clone)]
pub struct ExtraConfiguration {
    /// Redirect target for unauthorized GETs of restricted resources.
    pub login_uri: String,
    /// Body of GET 404 replies.
    pub not_found_body: Option<Bytes>,
}

impl Default for ExtraConfiguration {
    fn default() -> Self {
        Self {
            login_uri: "/login".to_string(),
            not_found_body: None,
        }
    }
}

/// Everything a request needs, frozen when the router is built.
#[derive(Debug)]
pub struct HostState {
    pub resources: ResourceRegistry,
    pub posts: PostRegistry,
    pub gate: SecurityGate,
    pub extra: ExtraConfiguration,
    pub max_body_size: usize,
}

/// Fallback handler receiving every request.
pub async fn dispatch(State(state): State<Arc<HostState>>, request: Request) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = normalize_path(
        request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/"),
    );
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    tracing::debug!(request_id = %request_id, method = %method, path = %path, "Dispatching request");

    let response = match RequestKind::classify(&method) {
        RequestKind::Get => serve_get(&state, &path, request.headers()).await,
        RequestKind::Post => serve_post(&state, path, request).await,
        RequestKind::Unsupported => {
            tracing::debug!(request_id = %request_id, method = %method, "Method not allowed");
            response::method_not_allowed()
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), start);
    response
}

async fn serve_get(state: &HostState, path: &str, headers: &HeaderMap) -> Response {
    let Some(resource) = state.resources.lookup(path) else {
        tracing::debug!(path, "Resource not found");
        return response::not_found(state.extra.not_found_body.as_ref());
    };

    if resource.restricted {
        let token = extract_token(headers);
        if !state.gate.authorize(token.as_deref()).await {
            tracing::debug!(path, login = %state.extra.login_uri, "Unauthorized, redirecting");
            return response::redirect(&state.extra.login_uri);
        }
    }

    response::page(resource)
}

async fn serve_post(state: &HostState, path: String, request: Request) -> Response {
    let Some(route) = state.posts.lookup(&path) else {
        tracing::debug!(path = %path, "POST handler not found");
        return response::post_not_found();
    };

    let (parts, body) = request.into_parts();

    if route.restricted {
        let token = extract_token(&parts.headers);
        if !state.gate.authorize(token.as_deref()).await {
            tracing::debug!(path = %path, "Unauthorized POST");
            return response::unauthorized();
        }
    }

    let bytes = match buffer_body(body, state.max_body_size).await {
        Ok(bytes) => bytes,
        Err(response) => return response,
    };

    let parsed = match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(path = %path, error = %e, "Malformed JSON body");
            return response::bad_request(format!("malformed JSON body: {}", e));
        }
    };

    route
        .invoke(PostRequest {
            uri: path,
            headers: parts.headers,
            body: parsed,
        })
        .await
}

/// Read the whole body, bounded by `limit`.
async fn buffer_body(body: Body, limit: usize) -> Result<Bytes, Response> {
    to_bytes(body, limit).await.map_err(|e| {
        tracing::debug!(error = %e, limit, "Failed to buffer request body");
        response::payload_too_large()
    })
}
