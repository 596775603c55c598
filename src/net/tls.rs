//! TLS configuration and certificate loading.

use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

use crate::error::StartupError;

/// Fail unless both halves of the key pair exist on disk.
pub fn ensure_key_pair(key_path: &Path, cert_path: &Path) -> Result<(), StartupError> {
    if !key_path.exists() {
        return Err(StartupError::MissingKey(key_path.to_path_buf()));
    }
    if !cert_path.exists() {
        return Err(StartupError::MissingCert(cert_path.to_path_buf()));
    }
    Ok(())
}

/// Load TLS configuration from certificate and key files.
///
/// The resulting config advertises `h2` and `http/1.1` over ALPN.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, StartupError> {
    ensure_key_pair(key_path, cert_path)?;
    RustlsConfig::from_pem_file(cert_path, key_path)
        .await
        .map_err(StartupError::Tls)
}
