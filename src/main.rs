//! FlashFS - A Minimal Line-Protocol File Server
//!
//! This is the main entry point for the FlashFS server.
//! It parses the configuration, sets up logging and the TCP listener, and
//! serves connections until Ctrl+C.

use clap::Parser;
use flashfs::commands::CommandHandler;
use flashfs::config::ServerConfig;
use flashfs::connection::ConnectionStats;
use flashfs::server::{bind_listener, serve};
use flashfs::storage::{FileStore, PathLocks};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn print_banner(config: &ServerConfig) {
    println!(
        r#"
FlashFS v{} - Minimal Line-Protocol File Server
──────────────────────────────────────────────────
Server starting on {}

Commands: GET <path> | CREATE <path> | APPEND <path> <text> | REMOVE <path>
Use Ctrl+C to shutdown gracefully.
"#,
        flashfs::VERSION,
        config.bind_address()
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let config = ServerConfig::parse();
    config.validate()?;

    // Set up logging; RUST_LOG overrides the default level
    let default_level = if config.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    print_banner(&config);

    // Client paths resolve against the working directory
    if let Some(root) = &config.root {
        std::env::set_current_dir(root)?;
        info!(root = ?root, "Serving files from root directory");
    }

    let handler = CommandHandler::new(Arc::new(FileStore::new()), Arc::new(PathLocks::new()));
    let stats = Arc::new(ConnectionStats::new());

    let listener = bind_listener(&config).await?;
    info!("server: waiting for connections");

    // Set up graceful shutdown
    let shutdown = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received, stopping server..."),
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await
            }
        }
    };

    tokio::select! {
        _ = serve(listener, handler.clone(), Arc::clone(&stats), config.max_request_len) => {}
        _ = shutdown => {}
    }

    let files = handler.store().stats();
    info!(
        connections = stats.connections_accepted.load(Ordering::Relaxed),
        ok = stats.requests_ok.load(Ordering::Relaxed),
        failed = stats.requests_failed.load(Ordering::Relaxed),
        reads = files.reads,
        creates = files.creates,
        appends = files.appends,
        removes = files.removes,
        "Server shutdown complete"
    );
    Ok(())
}
