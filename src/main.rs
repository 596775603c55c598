use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use asset_host::config::HostConfig;
use asset_host::error::StartupError;
use asset_host::lifecycle::{build_server, load_or_default, signals, Shutdown};
use asset_host::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "asset-host")]
#[command(about = "HTTPS/HTTP2 host for static assets and JSON APIs", long_about = None)]
struct Cli {
    /// Configuration file (TOML).
    #[arg(short, long, default_value = "asset-host.toml")]
    config: PathBuf,

    /// Override `listener.host`.
    #[arg(long)]
    host: Option<String>,

    /// Override `listener.port`.
    #[arg(short, long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the configured assets (default)
    Serve,
    /// Load and validate the configuration, then exit
    Check,
    /// Print the command generating a self-signed key pair
    HelpKey,
    /// Print the expected layout of a static directory
    HelpStatic,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command.as_ref().unwrap_or(&Commands::Serve) {
        Commands::HelpKey => {
            println!("openssl req -newkey rsa:2048 -nodes -keyout key.pem -x509 -days 365 -out certificate.pem");
            return Ok(());
        }
        Commands::HelpStatic => {
            println!("Pattern for public assets: ./static/public/{{file_type}}/{{file_name}}.{{file_type}}");
            println!("Pattern for private assets: ./static/private/{{file_type}}/{{file_name}}.{{file_type}}");
            return Ok(());
        }
        Commands::Check | Commands::Serve => {}
    }

    let config = load(&cli)?;
    logging::init_logging(&config.observability);

    tracing::info!("asset-host v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        host = %config.listener.host,
        port = config.listener.port,
        assets = config.assets.len(),
        security = config.security.enabled,
        "Configuration loaded"
    );

    let (server, report) = build_server(&config)?;

    if matches!(cli.command, Some(Commands::Check)) {
        let mut uris: Vec<_> = server.resources().uris().collect();
        uris.sort_unstable();
        for uri in uris {
            println!("  {}", uri);
        }
        println!(
            "configuration ok: {} resources registered, {} registrations skipped",
            report.assets_registered, report.registrations_skipped
        );
        return Ok(());
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    server.start(server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Read the config file and apply command-line overrides.
fn load(cli: &Cli) -> Result<HostConfig, StartupError> {
    let mut config = load_or_default(&cli.config)?;

    if let Some(host) = &cli.host {
        config.listener.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.listener.port = port;
    }
    Ok(config)
}
