//! Registration subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     host_file / host_dir / host_static → ResourceRegistry::register
//!     post / post_restricted             → PostRegistry::register
//!
//! Serving (read-only, shared via Arc):
//!     GET  path → ResourceRegistry::lookup
//!     POST path → PostRegistry::lookup
//! ```
//!
//! # Design Decisions
//! - Registries are owned by a server instance, never global
//! - Frozen when the router is built; no runtime unregistration
//! - Last write wins for duplicate paths

pub mod post;
pub mod resource;

pub use post::{PostHandler, PostRegistry, PostRequest, PostRoute};
pub use resource::{Resource, ResourceRegistry};
