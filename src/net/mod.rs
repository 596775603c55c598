//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → axum-server (accept loop, per-connection task)
//!     → tls.rs (rustls handshake, ALPN h2 / http/1.1)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - Missing key material is fatal before any socket is bound
//! - Connection errors stay inside their own task

pub mod tls;
