//! Star Office server entrypoint.
//!
//! Serves the activity record to the office UI. It is a pure reader: the only
//! write it ever does is the auto-idle write-back inside the store.
//!
//! Settings come from, in order of precedence: command-line flags,
//! `<root>/config.toml`, built-in defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, warn};

use office_core::{load_server_config, ServerConfig, StateStore, StorageConfig};

mod routes;

use routes::AppState;

#[derive(Parser)]
#[command(name = "office-server")]
#[command(about = "Star Office status service")]
#[command(version)]
struct Cli {
    /// Config file (default: <root>/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// IP address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// State file (default: <root>/state.json)
    #[arg(long, value_name = "PATH")]
    state_file: Option<PathBuf>,

    /// Directory holding index.html and static assets (default: <root>/frontend)
    #[arg(long, value_name = "DIR")]
    frontend_dir: Option<PathBuf>,
}

/// Fully resolved runtime settings.
struct Settings {
    addr: SocketAddr,
    state_file: PathBuf,
    frontend_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    let storage = match StorageConfig::resolve() {
        Ok(storage) => storage,
        Err(err) => {
            error!(error = %err, "Failed to resolve storage root");
            std::process::exit(1);
        }
    };

    let config_path = cli.config.clone().unwrap_or_else(|| storage.config_file());
    let config = match load_server_config(&config_path) {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %err, "Failed to load server config; using defaults");
            ServerConfig::default()
        }
    };

    let settings = match resolve_settings(cli, config, &storage) {
        Ok(settings) => settings,
        Err(err) => {
            error!(error = %err, "Invalid server settings");
            std::process::exit(1);
        }
    };

    let store = match StateStore::open(&settings.state_file) {
        Ok(store) => store,
        Err(err) => {
            error!(error = %err, "Failed to initialize state file");
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(settings.addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(error = %err, addr = %settings.addr, "Failed to bind listener");
            std::process::exit(1);
        }
    };

    info!(
        addr = %settings.addr,
        state_file = %store.file_path().display(),
        frontend_dir = %settings.frontend_dir.display(),
        "Star Office server started"
    );

    let app = routes::router(AppState::new(store, settings.frontend_dir));
    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %err, "Server terminated with error");
        std::process::exit(1);
    }

    info!("Star Office server stopped");
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(office_core::logging::env_filter())
        .init();
}

fn resolve_settings(
    cli: Cli,
    config: ServerConfig,
    storage: &StorageConfig,
) -> Result<Settings, String> {
    let host = cli.host.unwrap_or(config.host);
    let port = cli.port.unwrap_or(config.port);
    let addr = format!("{}:{}", host, port)
        .parse::<SocketAddr>()
        .map_err(|err| format!("Invalid bind address {}:{}: {}", host, port, err))?;

    let state_file = cli
        .state_file
        .or(config.state_file)
        .unwrap_or_else(|| storage.state_file());
    let frontend_dir = cli
        .frontend_dir
        .or(config.frontend_dir)
        .unwrap_or_else(|| storage.frontend_dir());

    Ok(Settings {
        addr,
        state_file,
        frontend_dir,
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
