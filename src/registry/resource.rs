//! GET resources and their registry.
//!
//! # Responsibilities
//! - Describe one servable artifact (bytes, type, cache policy, encoding, access)
//! - Store resources keyed by canonical path
//! - Replace on duplicate registration (last write wins)
//!
//! # Design Decisions
//! - Keys are path components only; callers normalize before lookup
//! - Resources are immutable once registered and shared via `Arc`

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::http::StatusCode;

use crate::assets::mime::ContentType;

/// One servable GET artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    /// Canonical path, without query string.
    pub uri: String,
    /// Payload as stored (never pre-encoded).
    pub data: Bytes,
    pub content_type: ContentType,
    /// Requires authorization before being served.
    pub restricted: bool,
    /// `max-age` in seconds; 0 disables the `cache-control` header.
    pub cache_seconds: u32,
    /// Gzip the payload on the wire.
    pub compressed: bool,
    /// Status of a successful reply, 200 unless changed.
    pub status: StatusCode,
}

impl Resource {
    /// A public, uncached, uncompressed HTML resource.
    pub fn new(uri: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            uri: uri.into(),
            data: data.into(),
            content_type: ContentType::default(),
            restricted: false,
            cache_seconds: 0,
            compressed: false,
            status: StatusCode::OK,
        }
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn restricted(mut self, restricted: bool) -> Self {
        self.restricted = restricted;
        self
    }

    pub fn cache_seconds(mut self, seconds: u32) -> Self {
        self.cache_seconds = seconds;
        self
    }

    pub fn compressed(mut self, compressed: bool) -> Self {
        self.compressed = compressed;
        self
    }
}

/// Path -> resource map owned by one server instance.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    resources: HashMap<String, Arc<Resource>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a resource, returning the one it replaced.
    pub fn register(&mut self, resource: Resource) -> Option<Arc<Resource>> {
        let previous = self
            .resources
            .insert(resource.uri.clone(), Arc::new(resource));

        if let Some(prev) = &previous {
            tracing::debug!(uri = %prev.uri, "Resource replaced");
        }
        previous
    }

    /// Look up a resource by normalized path.
    pub fn lookup(&self, uri: &str) -> Option<&Arc<Resource>> {
        self.resources.get(uri)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Registered paths, in no particular order.
    pub fn uris(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }
}
