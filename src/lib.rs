//! # FlashFS - A Minimal Line-Protocol File Server
//!
//! FlashFS serves files over TCP with a one-line text protocol. A client
//! connects, sends a single command, receives one reply and is disconnected.
//!
//! ## Features
//!
//! - **Four commands**: `GET`, `CREATE`, `APPEND`, `REMOVE`
//! - **Typed requests**: every line becomes a `Command` or a protocol error
//! - **Per-path locking**: concurrent requests on one path never interleave
//! - **Async I/O**: Built on Tokio, one task per connection
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                               FlashFS                                   │
//! │                                                                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐                  │
//! │  │ TCP Server  │───>│ Connection  │───>│  Command    │                  │
//! │  │ (Listener)  │    │  Handler    │    │  Handler    │                  │
//! │  └─────────────┘    └──────┬──────┘    └──────┬──────┘                  │
//! │                            │                  │                         │
//! │                            ▼                  ▼                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌──────────────────────────┐     │
//! │  │   Line      │    │  Response   │    │  PathLocks + FileStore   │     │
//! │  │   Parser    │    │  Encoder    │    │   (64 RwLock shards)     │     │
//! │  └─────────────┘    └─────────────┘    └──────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use flashfs::commands::CommandHandler;
//! use flashfs::config::ServerConfig;
//! use flashfs::connection::ConnectionStats;
//! use flashfs::server::{bind_listener, serve};
//! use flashfs::storage::{FileStore, PathLocks};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::default();
//!     let handler = CommandHandler::new(Arc::new(FileStore::new()), Arc::new(PathLocks::new()));
//!     let stats = Arc::new(ConnectionStats::new());
//!
//!     let listener = bind_listener(&config).await?;
//!     serve(listener, handler, stats, config.max_request_len).await;
//!     Ok(())
//! }
//! ```
//!
//! ## Protocol
//!
//! | Request | Success reply | Failures |
//! |---|---|---|
//! | `GET <path>` | raw file bytes | 404, 422, 500 |
//! | `CREATE <path>` | `server: created file '<path>' [200]` | 422, 500 |
//! | `APPEND <path> <text>` | `APPEND returned 200.` | 404, 422, 500 |
//! | `REMOVE <path>` | `server: removed file '<path>' [200]` | 422, 500 |
//! | anything else | | 400 |
//!
//! Paths are used verbatim and are not sanitized. Embedders exposing the
//! server to untrusted networks must validate paths themselves.
//!
//! ## Module Overview
//!
//! - [`protocol`]: request parsing, status codes and reply encoding
//! - [`commands`]: the dispatcher and the four command handlers
//! - [`storage`]: filesystem access and the per-path lock table
//! - [`connection`]: single-request client connections
//! - [`server`]: listener setup and accept loop
//! - [`config`]: command-line configuration

pub mod commands;
pub mod config;
pub mod connection;
pub mod protocol;
pub mod server;
pub mod storage;

// Re-export commonly used types for convenience
pub use commands::CommandHandler;
pub use config::ServerConfig;
pub use connection::{handle_connection, ConnectionStats};
pub use protocol::{Command, Outcome, ParseError, Status};
pub use storage::{FileStore, PathLocks};

/// The default port FlashFS listens on
pub const DEFAULT_PORT: u16 = 3490;

/// The default host FlashFS binds to (all interfaces)
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// The default listen backlog
pub const DEFAULT_BACKLOG: u32 = 10;

/// The default maximum request size in bytes
pub const MAX_REQUEST_LEN: usize = 2048;

/// Version of FlashFS
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
