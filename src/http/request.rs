//! Request inspection.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4)
//! - Normalize the request path used as registry key
//! - Extract the credential token from cookies
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Registry keys never contain query strings or fragments

use axum::http::{header::COOKIE, HeaderMap, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use url::Url;
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Cookie key carrying the credential token.
pub const TOKEN_COOKIE: &str = "Token";

/// Generates `x-request-id` values for requests that arrive without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Reduce a request target to the path used as registry key.
///
/// Query and fragment are dropped and dot-segments resolved, so `/a/./b?x=1`
/// becomes `/a/b`.
pub fn normalize_path(raw: &str) -> String {
    let resolved = Url::parse("https://localhost/")
        .and_then(|base| base.join(raw))
        .map(|url| url.path().to_string());

    match resolved {
        Ok(path) => path,
        Err(_) => {
            let end = raw.find(['?', '#']).unwrap_or(raw.len());
            raw[..end].to_string()
        }
    }
}

/// Value of the `Token=` cookie, if any.
///
/// Every `cookie` header is searched, since HTTP/2 clients may split cookies
/// across several. An empty value counts as no token.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| name.trim() == TOKEN_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
