//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the host.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::assets::mime::ContentType;

/// Root configuration for the asset host.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HostConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// TLS key pair.
    pub tls: TlsConfig,

    /// Login redirect and 404 fallback.
    pub extra: ExtraConfig,

    /// Credential gate settings.
    pub security: SecurityConfig,

    /// Request limits.
    pub limits: LimitsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Assets registered at startup.
    pub assets: Vec<AssetConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8443,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Path to private key file (PEM).
    pub key_path: PathBuf,

    /// Path to certificate file (PEM).
    pub cert_path: PathBuf,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            key_path: PathBuf::from("key.pem"),
            cert_path: PathBuf::from("certificate.pem"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtraConfig {
    /// Where unauthenticated GETs of restricted resources are redirected.
    pub login_uri: String,

    /// File served as the body of GET 404 replies.
    pub not_found_path: Option<PathBuf>,
}

impl Default for ExtraConfig {
    fn default() -> Self {
        Self {
            login_uri: "/login".to_string(),
            not_found_path: None,
        }
    }
}

/// Credential gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SecurityConfig {
    pub enabled: bool,

    /// Record field tokens are matched against.
    pub lookup_field: String,

    /// JSON array of credential records.
    pub credentials_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum buffered POST body in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// How an asset entry is discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// A single file at an explicit uri.
    File,
    /// Every file directly inside a directory.
    Dir,
    /// A `static/` tree with `public/` and `private/` branches.
    Static,
}

/// One `[[assets]]` entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetConfig {
    pub kind: AssetKind,

    pub path: PathBuf,

    /// Target uri, or a `{0}`/`{1}` template for `dir` and `static`.
    #[serde(default)]
    pub uri: Option<String>,

    /// Overrides the type derived from the file extension.
    #[serde(default)]
    pub content_type: Option<ContentType>,

    #[serde(default)]
    pub restricted: bool,

    #[serde(default)]
    pub cache_seconds: u32,

    #[serde(default)]
    pub compressed: bool,
}
