//! Error taxonomy for the host.
//!
//! # Classes
//! - [`StartupError`]: fatal, the process must not start serving
//! - [`RegistrationError`]: recoverable, the single registration is logged and skipped
//!
//! Request-level failures never surface as errors; they are mapped to one of the
//! reply shapes in [`crate::http::response`].

use std::path::PathBuf;

use crate::config::loader::ConfigError;

/// Errors that prevent the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The TLS private key file does not exist.
    #[error("TLS key path isn't valid: {0:?}")]
    MissingKey(PathBuf),

    /// The TLS certificate file does not exist.
    #[error("TLS cert path isn't valid: {0:?}")]
    MissingCert(PathBuf),

    /// The key pair exists but could not be loaded.
    #[error("failed to load TLS material: {0}")]
    Tls(#[source] std::io::Error),

    /// `host:port` does not form a socket address.
    #[error("invalid listen address {0}")]
    Address(String),

    /// The listener could not be bound or failed while serving.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised by a single registration call.
///
/// These are logged by the caller and never stop the server.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    /// The backing file of a resource could not be read.
    #[error("failed to load resource {path:?}: {source}")]
    ResourceLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content type tag has no MIME mapping.
    #[error("unknown content type {tag:?} for {uri}")]
    UnknownContentType { uri: String, tag: String },

    /// `host_static` was pointed at something other than a `static` directory.
    #[error("wrong static directory: {0:?}")]
    NotStaticRoot(PathBuf),

    /// The credential store does not expose the requested lookup field.
    #[error("credential store has no field {0:?}")]
    UnknownSecurityField(String),

    /// The credential store could not be loaded.
    #[error("failed to load credentials: {0}")]
    Credentials(#[from] crate::security::credentials::CredentialError),
}
