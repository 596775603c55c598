//! Method-based request classification.
//!
//! ```text
//! GET  → Get        (resource lookup)
//! POST → Post       (buffer body, handler dispatch)
//! *    → Unsupported (405, terminal)
//! ```
//!
//! `HEAD` is advertised in the `accept` header of 405 replies but is not served.

use axum::http::Method;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Get,
    Post,
    Unsupported,
}

impl RequestKind {
    pub fn classify(method: &Method) -> Self {
        if method == Method::GET {
            Self::Get
        } else if method == Method::POST {
            Self::Post
        } else {
            Self::Unsupported
        }
    }
}
