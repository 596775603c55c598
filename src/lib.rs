//! HTTPS/HTTP2 host for in-memory assets and JSON POST handlers.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                  ASSET HOST                  │
//!   Client Request        │  ┌─────────┐    ┌────────────┐               │
//!   ──────────────────────┼─▶│net (TLS)│───▶│ http server│               │
//!                         │  └─────────┘    └─────┬──────┘               │
//!                         │                       ▼                      │
//!                         │               ┌──────────────┐               │
//!                         │               │  classifier  │── 405         │
//!                         │               └──┬────────┬──┘               │
//!                         │            GET   ▼        ▼  POST            │
//!                         │        ┌──────────┐  ┌──────────┐            │
//!                         │        │ resource │  │   post   │            │
//!                         │        │ registry │  │ registry │            │
//!                         │        └────┬─────┘  └────┬─────┘            │
//!                         │             └─────┬───────┘                  │
//!                         │                   ▼                          │
//!                         │           ┌──────────────┐   ┌────────────┐  │
//!                         │           │security gate │──▶│ credential │  │
//!                         │           └──────┬───────┘   │   store    │  │
//!   Client Response       │                  ▼           └────────────┘  │
//!   ◀─────────────────────┼────────── response emitter                   │
//!                         └──────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use asset_host::http::{response, HostServer, ServerOptions};
//! use asset_host::lifecycle::Shutdown;
//! use asset_host::registry::{PostRequest, Resource};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut server = HostServer::new(ServerOptions::new("0.0.0.0", 8443, "key.pem", "certificate.pem"))?;
//! server.register(Resource::new("/hello", "hi"));
//! server.post("/api/echo", |req: PostRequest| async move { response::json(&req.body) });
//!
//! let shutdown = Shutdown::new();
//! server.start(shutdown.subscribe()).await?;
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod registry;
pub mod security;

pub use config::HostConfig;
pub use error::{RegistrationError, StartupError};
pub use http::{HostServer, ServerOptions};
pub use lifecycle::Shutdown;
