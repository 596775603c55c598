//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::io::Read;
use std::sync::Arc;

use asset_host::http::{HostServer, ServerOptions};
use asset_host::security::MemoryCredentialStore;
use flate2::read::GzDecoder;
use tempfile::TempDir;

/// Token accepted by [`secured_server`].
pub const VALID_TOKEN: &str = "valid-token";

/// A server whose key pair lives in a fresh temp dir.
///
/// The files only have to exist for construction; nothing here loads them.
pub fn server() -> (TempDir, HostServer) {
    let dir = tempfile::tempdir().unwrap();
    let key = dir.path().join("key.pem");
    let cert = dir.path().join("certificate.pem");
    std::fs::write(&key, "key").unwrap();
    std::fs::write(&cert, "cert").unwrap();

    let server = HostServer::new(ServerOptions::new("127.0.0.1", 0, key, cert)).unwrap();
    (dir, server)
}

/// Like [`server`], with security accepting [`VALID_TOKEN`] in the `token` field.
pub fn secured_server() -> (TempDir, HostServer) {
    let (dir, mut server) = server();
    let store = MemoryCredentialStore::new(["token"]);
    let record = serde_json::json!({ "token": VALID_TOKEN, "name": "alice" });
    store.insert(record.as_object().cloned().unwrap());
    server.secure(Arc::new(store), "token").unwrap();
    (dir, server)
}

pub fn gunzip(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    GzDecoder::new(data).read_to_end(&mut out).unwrap();
    out
}

pub fn token_cookie(token: &str) -> String {
    format!("Token={}", token)
}

/// Like [`server`], with `configure` applied to the options first.
pub fn server_with(configure: impl FnOnce(&mut ServerOptions)) -> (TempDir, HostServer) {
    let (dir, server) = server();
    let mut options = server.options().clone();
    configure(&mut options);
    (dir, HostServer::new(options).unwrap())
}
