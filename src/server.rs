//! Server Module
//!
//! Listener setup and the accept loop for FlashFS.
//!
//! ## Overview
//!
//! ```text
//! bind_listener(config)
//!        │  resolve host, SO_REUSEADDR, listen(backlog)
//!        ▼
//! serve(listener, ...)
//!        │
//!        ├──accept──> tokio::spawn(handle_connection)   one task per client
//!        ├──accept──> tokio::spawn(handle_connection)
//!        └── ...
//! ```
//!
//! Every accepted connection gets its own task and the loop goes straight
//! back to `accept`. A failed `accept` is logged and the loop carries on.
//!
//! ## Example
//!
//! ```no_run
//! use flashfs::server::{bind_listener, serve};
//! use flashfs::{CommandHandler, ConnectionStats, FileStore, PathLocks, ServerConfig};
//! use std::sync::Arc;
//!
//! # async fn run() -> std::io::Result<()> {
//! let config = ServerConfig::default();
//! let listener = bind_listener(&config).await?;
//! let handler = CommandHandler::new(Arc::new(FileStore::new()), Arc::new(PathLocks::new()));
//! serve(listener, handler, Arc::new(ConnectionStats::new()), config.max_request_len).await;
//! # Ok(())
//! # }
//! ```

use crate::commands::CommandHandler;
use crate::config::ServerConfig;
use crate::connection::{handle_connection, ConnectionStats};
use std::io;
use std::sync::Arc;
use tokio::net::{lookup_host, TcpListener, TcpSocket};
use tracing::{error, info};

/// Binds the listening socket described by `config`.
///
/// Uses the first address the host resolves to, with `SO_REUSEADDR` set and
/// the configured backlog.
pub async fn bind_listener(config: &ServerConfig) -> io::Result<TcpListener> {
    let addr = lookup_host(config.bind_address())
        .await?
        .next()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("no address for {}", config.bind_address()),
            )
        })?;

    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;

    let listener = socket.listen(config.backlog)?;
    info!(addr = %listener.local_addr()?, backlog = config.backlog, "Listening");
    Ok(listener)
}

/// Accepts connections forever, one task per connection.
pub async fn serve(
    listener: TcpListener,
    handler: CommandHandler,
    stats: Arc<ConnectionStats>,
    max_request_len: usize,
) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let handler = handler.clone();
                let stats = Arc::clone(&stats);

                tokio::spawn(async move {
                    handle_connection(stream, addr, handler, stats, max_request_len).await;
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}
