//! Switchboard Server
//!
//! Run with: cargo run
//!
//! # Configuration
//!
//! Settings come from a TOML config file, environment variables, and CLI
//! flags, in increasing order of precedence.
//!
//! Environment variables:
//! - `SWITCHBOARD_HOST`: Host to bind to (default: 0.0.0.0)
//! - `SWITCHBOARD_PORT`: Port to listen on (default: 3000)
//! - `SWITCHBOARD_STATIC_DIR`: Static asset directory (default: public)
//! - `SWITCHBOARD_MAX_CONNECTIONS`: Connection limit (default: 1000)
//! - `SWITCHBOARD_LOG_LEVEL`: Log level (default: info)
//! - `SWITCHBOARD_LOG_FORMAT`: pretty or json (default: pretty)
//! - `RUST_LOG`: Full filter override

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use switchboard::api::{serve, AppState};
use switchboard::config::{generate_default_config, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "switchboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "WebRTC signaling relay")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory of static assets to serve
    #[arg(long)]
    static_dir: Option<String>,

    /// Print a default config file to stdout and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load_default(),
    };

    // CLI flags win over file and environment.
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(static_dir) = cli.static_dir {
        config.server.static_dir = static_dir;
    }

    init_tracing(&config);

    tracing::info!("Starting Switchboard v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Static assets: {}", config.server.static_dir);
    tracing::info!("Connection limit: {}", config.relay.max_connections);

    let state = AppState::new(config);
    serve(state).await?;

    tracing::info!("Switchboard stopped");
    Ok(())
}

/// Initialize tracing per the logging config
fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("switchboard={},tower_http=info", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
