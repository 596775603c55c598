//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Own the registries, security gate and extra settings while they are populated
//! - Freeze them into an Axum router with tracing, request IDs, timeouts
//! - Serve the router over TLS (HTTP/2 and HTTP/1.1)
//! - Graceful shutdown on the lifecycle broadcast

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::Request;
use axum::Router;
use axum_server::Handle;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::assets::discovery::{self, HostDir, HostFile, HostStatic};
use crate::config::HostConfig;
use crate::error::{RegistrationError, StartupError};
use crate::http::dispatch::{dispatch, ExtraConfiguration, HostState};
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::net::tls;
use crate::observability::metrics;
use crate::registry::{PostHandler, PostRegistry, Resource, ResourceRegistry};
use crate::security::{CredentialStore, SecurityGate};

/// Where and how to listen.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub host: String,
    pub port: u16,
    pub key_path: PathBuf,
    pub cert_path: PathBuf,
    /// Largest POST body that will be buffered.
    pub max_body_size: usize,
    pub request_timeout: Duration,
}

impl ServerOptions {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        key_path: impl Into<PathBuf>,
        cert_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            key_path: key_path.into(),
            cert_path: cert_path.into(),
            max_body_size: 2 * 1024 * 1024,
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn from_config(config: &HostConfig) -> Self {
        Self {
            max_body_size: config.limits.max_body_size,
            request_timeout: Duration::from_secs(config.timeouts.request_secs),
            ..Self::new(
                config.listener.host.clone(),
                config.listener.port,
                config.tls.key_path.clone(),
                config.tls.cert_path.clone(),
            )
        }
    }
}

/// HTTPS host for registered resources and POST handlers.
///
/// Registration happens on `&mut self`; [`HostServer::into_router`] and
/// [`HostServer::start`] consume the server, so nothing can be registered once
/// requests are being served.
pub struct HostServer {
    options: ServerOptions,
    resources: ResourceRegistry,
    posts: PostRegistry,
    gate: SecurityGate,
    extra: ExtraConfiguration,
}

impl HostServer {
    /// Create a server. Fails if the TLS key or certificate file is missing.
    pub fn new(options: ServerOptions) -> Result<Self, StartupError> {
        tls::ensure_key_pair(&options.key_path, &options.cert_path)?;

        Ok(Self {
            options,
            resources: ResourceRegistry::new(),
            posts: PostRegistry::new(),
            gate: SecurityGate::disabled(),
            extra: ExtraConfiguration::default(),
        })
    }

    pub fn options(&self) -> &ServerOptions {
        &self.options
    }

    pub fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }

    pub fn posts(&self) -> &PostRegistry {
        &self.posts
    }

    pub fn security_enabled(&self) -> bool {
        self.gate.is_enabled()
    }

    /// Set the login redirect and load the GET 404 body from a file.
    ///
    /// The login uri is applied even if the 404 file cannot be read.
    pub fn extra(
        &mut self,
        login_uri: Option<String>,
        not_found_path: Option<&Path>,
    ) -> Result<(), RegistrationError> {
        if let Some(uri) = login_uri {
            self.extra.login_uri = uri;
        }

        if let Some(path) = not_found_path {
            match std::fs::read(path) {
                Ok(data) => self.extra.not_found_body = Some(Bytes::from(data)),
                Err(source) => {
                    let e = RegistrationError::ResourceLoad {
                        path: path.to_path_buf(),
                        source,
                    };
                    tracing::warn!(error = %e, "404 fallback not loaded");
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Enable the security gate with `store`, matching tokens against `field`.
    pub fn secure(
        &mut self,
        store: Arc<dyn CredentialStore>,
        field: impl Into<String>,
    ) -> Result<(), RegistrationError> {
        self.gate.secure(store, field)
    }

    /// Register a resource directly.
    pub fn register(&mut self, resource: Resource) {
        metrics::record_registration("resource", "ok");
        self.resources.register(resource);
    }

    pub fn host_file(&mut self, input: HostFile) -> Result<(), RegistrationError> {
        discovery::host_file(&mut self.resources, input)
    }

    pub fn host_dir(&mut self, input: HostDir) -> Result<usize, RegistrationError> {
        discovery::host_dir(&mut self.resources, input)
    }

    pub fn host_static(&mut self, input: HostStatic) -> Result<usize, RegistrationError> {
        discovery::host_static(&mut self.resources, input)
    }

    /// Register a public POST handler.
    pub fn post<H: PostHandler>(&mut self, uri: impl Into<String>, handler: H) {
        self.register_post(uri, false, handler);
    }

    /// Register a POST handler that requires authorization.
    pub fn post_restricted<H: PostHandler>(&mut self, uri: impl Into<String>, handler: H) {
        self.register_post(uri, true, handler);
    }

    pub fn register_post<H: PostHandler>(&mut self, uri: impl Into<String>, restricted: bool, handler: H) {
        metrics::record_registration("post", "ok");
        self.posts.register(uri, restricted, handler);
    }

    /// Freeze the registries and build the router.
    pub fn into_router(self) -> Router {
        metrics::record_registry_sizes(self.resources.len(), self.posts.len());
        tracing::info!(
            resources = self.resources.len(),
            post_handlers = self.posts.len(),
            security = self.gate.is_enabled(),
            "Registries frozen"
        );

        let state = Arc::new(HostState {
            resources: self.resources,
            posts: self.posts,
            gate: self.gate,
            extra: self.extra,
            max_body_size: self.options.max_body_size,
        });
        build_router(state, self.options.request_timeout)
    }

    /// Load TLS material, bind and serve until `shutdown` fires.
    pub async fn start(self, mut shutdown: broadcast::Receiver<()>) -> Result<(), StartupError> {
        let options = self.options.clone();
        let tls_config = tls::load_tls_config(&options.cert_path, &options.key_path).await?;

        let addr = resolve(&options.host, options.port).await?;
        let app = self.into_router();

        let handle = Handle::new();
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!("Shutdown signal received, draining connections");
            shutdown_handle.graceful_shutdown(Some(Duration::from_secs(10)));
        });

        tracing::info!("Listen to: https://{}:{}", options.host, options.port);

        axum_server::bind_rustls(addr, tls_config)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .map_err(StartupError::Serve)?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn resolve(host: &str, port: u16) -> Result<SocketAddr, StartupError> {
    tokio::net::lookup_host((host, port))
        .await
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| StartupError::Address(format!("{}:{}", host, port)))
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
fn build_router(state: Arc<HostState>, request_timeout: Duration) -> Router {
    Router::new()
        .fallback(dispatch)
        .with_state(state)
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(X_REQUEST_ID)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
                request_id = %request_id,
            )
        }))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
