use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kosan::config::Config;
use kosan::AppState;

#[derive(Parser, Debug)]
#[command(name = "kosan")]
#[command(author, version, about = "Room rental backend", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "KOSAN_CONFIG", default_value = "kosan.toml")]
    config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the API server (default)
    Serve,
    /// Print an argon2 hash for a password, for seeding users by hand
    HashPassword {
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Command::HashPassword { password }) = &cli.command {
        let hash = kosan::api::auth::hash_password(password)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
        println!("{}", hash);
        return Ok(());
    }

    // Load configuration
    let config = Config::load(&cli.config)?;

    // Initialize logging
    let log_level = match &cli.log_level {
        Some(level) => level.clone(),
        None => config.log_filter().to_string(),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting kosan v{}", env!("CARGO_PKG_VERSION"));

    // Initialize database
    let db = kosan::db::init(&config.database).await?;

    // Ensure the configured admin user exists
    kosan::db::ensure_admin_user(&db, &config.auth).await?;

    let state = Arc::new(AppState::new(config.clone(), db));
    let app = kosan::api::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
