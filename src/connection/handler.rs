//! Connection Handler Module
//!
//! This module handles individual client connections to FlashFS.
//! Each connection carries exactly one request and gets exactly one reply.
//!
//! ## Connection Lifecycle
//!
//! ```text
//! 1. Client connects (TCP handshake)
//!        │
//!        ▼
//! 2. ConnectionHandler spawned
//!        │
//!        ▼
//! 3. Read request bytes (until newline, EOF or the size limit)
//!        │
//!        ▼
//! 4. Dispatch on the blocking pool (file I/O is synchronous)
//!        │
//!        ▼
//! 5. Send reply, shut down the write half
//!        │
//!        ▼
//! 6. Handler task ends
//! ```
//!
//! ## Request Size
//!
//! Only the first line is the request: bytes after the first newline are
//! ignored, however TCP splits them. If `max_request_len` bytes arrive
//! without a newline the request is rejected with `422` and never reaches
//! the dispatcher.

use crate::commands::CommandHandler;
use crate::protocol::{send_response, trim_request, EncodeError, Outcome, Status};
use bytes::{BufMut, BytesMut};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, error, info, trace, warn};

/// How long to keep reading after rejecting an oversized request
const DRAIN_TIMEOUT: Duration = Duration::from_millis(500);

/// Statistics for connection handling
#[derive(Debug, Default)]
pub struct ConnectionStats {
    /// Total number of connections accepted
    pub connections_accepted: AtomicU64,
    /// Currently active connections
    pub active_connections: AtomicU64,
    /// Requests answered with 200
    pub requests_ok: AtomicU64,
    /// Requests answered with an error status
    pub requests_failed: AtomicU64,
    /// Total bytes read
    pub bytes_read: AtomicU64,
    /// Total bytes written
    pub bytes_written: AtomicU64,
}

impl ConnectionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection_opened(&self) {
        self.connections_accepted.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        self.active_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn request_processed(&self, status: Status) {
        if status.is_ok() {
            self.requests_ok.fetch_add(1, Ordering::Relaxed);
        } else {
            self.requests_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn bytes_read(&self, count: usize) {
        self.bytes_read.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn bytes_written(&self, count: usize) {
        self.bytes_written
            .fetch_add(count as u64, Ordering::Relaxed);
    }
}

/// Handles a single client connection.
pub struct ConnectionHandler {
    /// The TCP stream for this connection
    stream: TcpStream,

    /// Client's address (for logging)
    addr: SocketAddr,

    /// Buffer for the request
    buffer: BytesMut,

    /// Maximum number of request bytes to read
    max_request_len: usize,

    /// The command handler (shares store and locks across connections)
    command_handler: CommandHandler,

    /// Connection statistics (shared)
    stats: Arc<ConnectionStats>,
}

impl ConnectionHandler {
    /// Creates a new connection handler.
    pub fn new(
        stream: TcpStream,
        addr: SocketAddr,
        command_handler: CommandHandler,
        stats: Arc<ConnectionStats>,
        max_request_len: usize,
    ) -> Self {
        stats.connection_opened();

        Self {
            stream,
            addr,
            buffer: BytesMut::with_capacity(max_request_len),
            max_request_len,
            command_handler,
            stats,
        }
    }

    /// Serves the connection's single request.
    ///
    /// Returns the status the client was answered with.
    pub async fn run(mut self) -> Result<Status, ConnectionError> {
        info!(client = %self.addr, "Client connected");

        let result = self.serve_request().await;

        match &result {
            Ok(status) => info!(client = %self.addr, status = %status, "Request served"),
            Err(ConnectionError::EmptyRequest) => {
                debug!(client = %self.addr, "Client closed without a request")
            }
            Err(ConnectionError::Encode(EncodeError::UnexpectedStatus(status))) => {
                error!(client = %self.addr, status = %status, "No reply defined for status")
            }
            Err(e) => warn!(client = %self.addr, error = %e, "Connection error"),
        }

        self.stats.connection_closed();
        result
    }

    /// Read, dispatch, reply.
    async fn serve_request(&mut self) -> Result<Status, ConnectionError> {
        self.read_request().await?;

        if self.buffer.is_empty() {
            return Err(ConnectionError::EmptyRequest);
        }

        let newline = self.buffer.iter().position(|&b| b == b'\n');
        let oversized = newline.is_none() && self.buffer.len() >= self.max_request_len;

        let outcome = if oversized {
            warn!(
                client = %self.addr,
                limit = self.max_request_len,
                "Request exceeds size limit"
            );
            self.buffer.clear();
            Outcome::failed(Status::UnprocessableEntity)
        } else {
            // Only the first line is the request; anything after it is ignored.
            let request = match newline {
                Some(pos) => self.buffer.split_to(pos + 1).freeze(),
                None => self.buffer.split().freeze(),
            };
            info!(
                client = %self.addr,
                bytes = request.len(),
                request = %String::from_utf8_lossy(trim_request(&request)),
                "Request received"
            );

            let handler = self.command_handler.clone();
            tokio::task::spawn_blocking(move || handler.process_request(&request)).await?
        };

        let status = outcome.status();
        self.stats.request_processed(status);

        let written = send_response(&outcome, &mut self.stream).await?;
        self.stats.bytes_written(written);
        trace!(client = %self.addr, bytes = written, "Sent response");

        self.stream.shutdown().await?;
        if oversized {
            self.drain_input().await;
        }
        Ok(status)
    }

    /// Reads until a newline arrives, the client stops sending, or the
    /// size limit is reached.
    async fn read_request(&mut self) -> Result<(), ConnectionError> {
        while self.buffer.len() < self.max_request_len {
            let remaining = self.max_request_len - self.buffer.len();
            let n = self
                .stream
                .read_buf(&mut (&mut self.buffer).limit(remaining))
                .await?;

            if n == 0 {
                break;
            }

            self.stats.bytes_read(n);
            trace!(client = %self.addr, bytes = n, "Read data");

            let start = self.buffer.len() - n;
            if self.buffer[start..].contains(&b'\n') {
                break;
            }
        }

        Ok(())
    }

    /// Discards unread input so closing the socket does not reset the
    /// connection before the client has read the reply.
    async fn drain_input(&mut self) {
        let mut scratch = [0u8; 4096];
        let drain = async {
            while let Ok(n) = self.stream.read(&mut scratch).await {
                if n == 0 {
                    break;
                }
            }
        };
        if tokio::time::timeout(DRAIN_TIMEOUT, drain).await.is_err() {
            debug!(client = %self.addr, "Gave up draining oversized request");
        }
    }
}

/// Errors that can occur while handling a connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// I/O error (network issue)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The reply could not be encoded or sent
    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    /// The client closed the connection without sending anything
    #[error("Empty request")]
    EmptyRequest,

    /// The blocking dispatch task panicked or was cancelled
    #[error("Dispatch task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Handles a client connection.
///
/// This is a convenience function that creates a ConnectionHandler
/// and runs it to completion.
pub async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    command_handler: CommandHandler,
    stats: Arc<ConnectionStats>,
    max_request_len: usize,
) {
    let handler = ConnectionHandler::new(stream, addr, command_handler, stats, max_request_len);
    if let Err(e) = handler.run().await {
        match e {
            ConnectionError::EmptyRequest => {}
            ConnectionError::IoError(ref io_err)
                if io_err.kind() == std::io::ErrorKind::ConnectionReset => {}
            _ => {
                debug!(client = %addr, error = %e, "Connection ended with error");
            }
        }
    }
}
