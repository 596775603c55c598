//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → HostConfig (validated, immutable)
//!     → lifecycle::startup builds the server from it
//! ```
//!
//! # Design Decisions
//! - Config is read once; registries built from it are frozen at start
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{AssetConfig, AssetKind, HostConfig, ListenerConfig, TlsConfig};
