//! Asset ingestion.
//!
//! # Data Flow
//! ```text
//! files on disk
//!     → discovery.rs (read, derive uri + type)
//!     → mime.rs (tag → MIME string)
//!     → registry::ResourceRegistry
//! ```

pub mod discovery;
pub mod mime;

pub use discovery::{HostDir, HostFile, HostStatic, ServeOptions};
pub use mime::ContentType;
