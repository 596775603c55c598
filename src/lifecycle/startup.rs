//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the server from a validated [`HostConfig`]
//! - Apply extra settings, security, then assets, in that order
//!
//! # Design Decisions
//! - Fail fast only on startup-fatal errors (TLS files)
//! - Every registration error is logged and skipped; the rest still loads

use std::path::Path;
use std::sync::Arc;

use crate::assets::discovery::{HostDir, HostFile, HostStatic, ServeOptions};
use crate::config::{load_config, AssetConfig, AssetKind, HostConfig};
use crate::error::{RegistrationError, StartupError};
use crate::http::{HostServer, ServerOptions};
use crate::security::{CredentialError, MemoryCredentialStore};

/// Outcome counters of [`build_server`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StartupReport {
    pub assets_registered: usize,
    pub registrations_skipped: usize,
}

/// Load `path`, or fall back to defaults when the file does not exist.
///
/// A file that exists but cannot be read, parsed or validated is fatal.
pub fn load_or_default(path: &Path) -> Result<HostConfig, StartupError> {
    if !path.exists() {
        tracing::warn!(path = ?path, "Config file not found, using defaults");
        return Ok(HostConfig::default());
    }
    Ok(load_config(path)?)
}

/// Create a server and register everything the configuration describes.
pub fn build_server(config: &HostConfig) -> Result<(HostServer, StartupReport), StartupError> {
    let mut server = HostServer::new(ServerOptions::from_config(config))?;
    let mut report = StartupReport::default();

    if server
        .extra(
            Some(config.extra.login_uri.clone()),
            config.extra.not_found_path.as_deref(),
        )
        .is_err()
    {
        report.registrations_skipped += 1;
    }

    if config.security.enabled {
        if let Err(e) = configure_security(&mut server, config) {
            tracing::warn!(error = %e, "Security not configured, restricted targets stay unreachable");
            report.registrations_skipped += 1;
        }
    }

    for asset in &config.assets {
        match register_asset(&mut server, asset) {
            Ok(count) => report.assets_registered += count,
            Err(_) => report.registrations_skipped += 1,
        }
    }

    tracing::info!(
        assets = report.assets_registered,
        skipped = report.registrations_skipped,
        "Startup registration complete"
    );
    Ok((server, report))
}

fn configure_security(server: &mut HostServer, config: &HostConfig) -> Result<(), RegistrationError> {
    let Some(path) = config.security.credentials_path.as_deref() else {
        return Err(CredentialError::Unavailable("security.credentials_path is not set".into()).into());
    };
    let store = MemoryCredentialStore::load_from_file(path)?;
    server.secure(Arc::new(store), config.security.lookup_field.clone())
}

fn register_asset(server: &mut HostServer, asset: &AssetConfig) -> Result<usize, RegistrationError> {
    let options = ServeOptions {
        restricted: asset.restricted,
        cache_seconds: asset.cache_seconds,
        compressed: asset.compressed,
    };

    match asset.kind {
        AssetKind::File => {
            let mut input = HostFile::new(&asset.path, asset.uri.clone().unwrap_or_default());
            if let Some(ty) = asset.content_type {
                input.content_type = ty;
            }
            input.options = options;
            server.host_file(input).map(|()| 1)
        }
        AssetKind::Dir => server.host_dir(HostDir {
            path: asset.path.clone(),
            uri: asset.uri.clone().unwrap_or_default(),
            content_type: asset.content_type,
            options,
        }),
        AssetKind::Static => server.host_static(HostStatic {
            path: asset.path.clone(),
            uri_template: asset.uri.clone(),
            cache_seconds: asset.cache_seconds,
            compressed: asset.compressed,
        }),
    }
}
