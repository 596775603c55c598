//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → http::request::extract_token (cookie "Token=")
//!     → [target is restricted?]
//!     → gate.rs (authorize via credential store)
//!     → allow, or 307 (GET) / 401 (POST)
//! ```
//!
//! # Design Decisions
//! - Fail closed: any failed or missing check denies
//! - The store is a narrow trait so the gate does not depend on a data layer

pub mod credentials;
pub mod gate;

pub use credentials::{CredentialError, CredentialRecord, CredentialStore, MemoryCredentialStore};
pub use gate::SecurityGate;
