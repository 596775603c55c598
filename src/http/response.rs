//! Response emitter.
//!
//! # Responsibilities
//! - Build every reply shape the host sends (page, JSON, 404, 405, 307, ...)
//! - Gzip bodies for compressed resources and JSON replies
//!
//! # Design Decisions
//! - Each shape is one complete `Response` value, so a request can only emit once
//! - Failures inside the emitter become status codes, never panics

use std::io::Write;

use axum::body::{Body, Bytes};
use axum::http::header::{
    ACCEPT, CACHE_CONTROL, CONTENT_ENCODING, CONTENT_TYPE, LOCATION,
};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;

use crate::registry::Resource;

/// Body of GET 404 replies when no fallback file is configured.
pub const NOT_FOUND_BODY: &str = "[404] Not Found";

/// `accept` header of 405 replies.
pub const ALLOWED_METHODS: &str = "GET, POST, HEAD";

/// Body of 401 replies for restricted POST handlers.
pub const SECURED_BODY: &str = "<h1> Secured Page </h1>";

const NOT_FOUND_CACHE: &str = "max-age=604800";

pub fn gzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Serve a registered resource.
pub fn page(resource: &Resource) -> Response {
    let mut headers = HeaderMap::new();
    match HeaderValue::from_str(&resource.content_type.header_value()) {
        Ok(value) => {
            headers.insert(CONTENT_TYPE, value);
        }
        Err(e) => {
            tracing::error!(uri = %resource.uri, error = %e, "Invalid content type header");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    if resource.cache_seconds > 0 {
        headers.insert(CACHE_CONTROL, max_age(resource.cache_seconds));
    }

    let body = if resource.compressed {
        match gzip(&resource.data) {
            Ok(encoded) => {
                headers.insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
                Body::from(encoded)
            }
            Err(e) => {
                tracing::error!(uri = %resource.uri, error = %e, "Failed to gzip resource");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        }
    } else {
        Body::from(resource.data.clone())
    };

    (resource.status, headers, body).into_response()
}

fn max_age(seconds: u32) -> HeaderValue {
    // Digits and ASCII only, always a valid header value.
    HeaderValue::from_str(&format!("max-age={}", seconds))
        .unwrap_or_else(|_| HeaderValue::from_static("no-cache"))
}

/// Serialize `value` as gzipped JSON.
pub fn json<T: Serialize + ?Sized>(value: &T) -> Response {
    json_with_headers(value, HeaderMap::new())
}

/// Like [`json`], with `extra` headers overriding the defaults.
pub fn json_with_headers<T: Serialize + ?Sized>(value: &T, extra: HeaderMap) -> Response {
    let encoded = serde_json::to_vec(value)
        .map_err(|e| e.to_string())
        .and_then(|raw| gzip(&raw).map_err(|e| e.to_string()));

    match encoded {
        Ok(body) => {
            let mut headers = HeaderMap::new();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            headers.insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
            headers.extend(extra);
            (StatusCode::OK, headers, body).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to encode JSON reply");
            StatusCode::BAD_GATEWAY.into_response()
        }
    }
}

/// GET miss: cached 404 with the fallback body or the default text.
pub fn not_found(fallback: Option<&Bytes>) -> Response {
    let body = fallback
        .cloned()
        .unwrap_or_else(|| Bytes::from_static(NOT_FOUND_BODY.as_bytes()));
    (
        StatusCode::NOT_FOUND,
        [(CACHE_CONTROL, HeaderValue::from_static(NOT_FOUND_CACHE))],
        body,
    )
        .into_response()
}

/// POST miss: bare 404.
pub fn post_not_found() -> Response {
    StatusCode::NOT_FOUND.into_response()
}

pub fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(ACCEPT, HeaderValue::from_static(ALLOWED_METHODS))],
    )
        .into_response()
}

/// 307 to `location`.
pub fn redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::TEMPORARY_REDIRECT, [(LOCATION, value)]).into_response(),
        Err(e) => {
            tracing::error!(location, error = %e, "Invalid redirect target");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Restricted POST handler without authorization.
pub fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"))],
        SECURED_BODY,
    )
        .into_response()
}

pub fn bad_request(reason: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, reason.into()).into_response()
}

pub fn payload_too_large() -> Response {
    StatusCode::PAYLOAD_TOO_LARGE.into_response()
}
