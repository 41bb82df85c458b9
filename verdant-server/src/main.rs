//! # Verdant Server
//!
//! Administrative API for the Verdant catalog.
//!
//! The server is built on Axum and uses PostgreSQL as the record store. All
//! store access goes through the ports composed in `AppUnitOfWork`.

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use verdant_core::database::DatabaseContext;
use verdant_server::{
    AppState,
    infra::config::{Config, ConfigLoad, ConfigLoader, ConfigWarnings, sources::FileConfig},
    routes,
};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "verdant-server")]
#[command(about = "Administrative API for the Verdant plant variety catalog")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Path to a verdant.toml configuration file
    #[arg(short, long, env = "VERDANT_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Load environment variables from this file instead of `./.env`
    #[arg(long, env = "VERDANT_ENV_FILE")]
    env_file: Option<PathBuf>,

    /// Server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long)]
    host: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load and print the effective configuration (secrets redacted) and exit
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let ConfigLoad {
        mut config,
        warnings,
    } = load_config(&cli.serve)?;

    if let Some(Command::CheckConfig) = cli.command {
        print_config(&config, &warnings)?;
        return Ok(());
    }

    if let Some(port) = cli.serve.port {
        config.server.port = port;
    }
    if let Some(host) = cli.serve.host.clone() {
        config.server.host = host;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    log_config(&config, &warnings);
    run_server(config).await
}

fn load_config(args: &ServeArgs) -> anyhow::Result<ConfigLoad> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = args.config.clone() {
        loader = loader.with_config_path(path);
    }
    if let Some(path) = args.env_file.clone() {
        loader = loader.with_env_file(path);
    }
    loader.load().context("failed to load configuration")
}

fn print_config(config: &Config, warnings: &ConfigWarnings) -> anyhow::Result<()> {
    let rendered = toml::to_string_pretty(&FileConfig::redacted(config))
        .context("failed to render configuration")?;
    match &config.metadata.config_path {
        Some(path) => println!("# loaded from {}", path.display()),
        None => println!("# no configuration file; environment only"),
    }
    println!("{rendered}");
    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => eprintln!("warning: {} ({hint})", warning.message),
            None => eprintln!("warning: {}", warning.message),
        }
    }
    Ok(())
}

fn log_config(config: &Config, warnings: &ConfigWarnings) {
    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "configuration file loaded");
    }

    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => {
                warn!(message = %warning.message, "configuration warning")
            }
        }
    }

    info!(
        database.url = %config.database.redacted_url(),
        database.max_connections = config.database.max_connections,
        database.acquire_timeout_secs = config.database.acquire_timeout_secs,
        "database configuration in effect"
    );
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let db = DatabaseContext::connect_postgres(
        &config.database.url,
        &config.database.pool_settings(),
    )
    .await
    .context("failed to connect to PostgreSQL")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::new(
        Arc::new(config),
        db.unit_of_work(),
        Some(db.postgres()),
    );
    let router = routes::create_app(state).into_make_service_with_connect_info::<SocketAddr>();

    info!("Starting Verdant server on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
