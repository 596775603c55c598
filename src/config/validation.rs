//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (port, body limit, timeouts)
//! - Check that security and asset entries are complete
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HostConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::{AssetKind, HostConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &HostConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError::new("listener.host", "must not be empty"));
    }
    if config.listener.port == 0 {
        errors.push(ValidationError::new("listener.port", "must be non-zero"));
    }
    if !config.extra.login_uri.starts_with('/') {
        errors.push(ValidationError::new("extra.login_uri", "must start with '/'"));
    }
    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::new("limits.max_body_size", "must be non-zero"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be non-zero"));
    }

    if config.security.enabled {
        if config.security.lookup_field.is_empty() {
            errors.push(ValidationError::new(
                "security.lookup_field",
                "required when security is enabled",
            ));
        }
        if config.security.credentials_path.is_none() {
            errors.push(ValidationError::new(
                "security.credentials_path",
                "required when security is enabled",
            ));
        }
    }

    for (i, asset) in config.assets.iter().enumerate() {
        let field = |name: &str| format!("assets[{}].{}", i, name);
        match asset.kind {
            AssetKind::File | AssetKind::Dir if asset.uri.is_none() => {
                errors.push(ValidationError::new(field("uri"), "required for file and dir assets"));
            }
            AssetKind::Static if !asset.path.ends_with("static") => {
                errors.push(ValidationError::new(field("path"), "must point at a 'static' directory"));
            }
            _ => {}
        }
        if let Some(uri) = &asset.uri {
            if !uri.starts_with('/') {
                errors.push(ValidationError::new(field("uri"), "must start with '/'"));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
