//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TLS connection (h2 / http/1.1)
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, path normalization, token)
//!     → classifier.rs (GET / POST / 405)
//!     → dispatch.rs (registry lookup, security gate)
//!     → response.rs (reply shapes, gzip)
//!     → Send to client
//! ```

pub mod classifier;
pub mod dispatch;
pub mod request;
pub mod response;
pub mod server;

pub use dispatch::ExtraConfiguration;
pub use request::{extract_token, normalize_path, X_REQUEST_ID};
pub use server::{HostServer, ServerOptions};
