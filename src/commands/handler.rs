//! Command Handler Module
//!
//! This module executes parsed commands against the filesystem and turns
//! every result, good or bad, into an [`Outcome`].
//!
//! ## Supported Commands
//!
//! - `GET path` - Read a whole file
//! - `CREATE path` - Create a file, truncating an existing one
//! - `APPEND path text` - Append text to an existing file
//! - `REMOVE path` - Delete a file
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CommandHandler                          │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐      │
//! │  │   parse()   │───>│  dispatch() │───>│  cmd_*()    │      │
//! │  └─────────────┘    └─────────────┘    └─────────────┘      │
//! │                                               │             │
//! │                                               ▼             │
//! │                                   PathLocks + FileStore     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers never fail: a missing file or a bad argument is a normal
//! outcome with a non-200 status.

use crate::protocol::{parse_command, trim_request, Command, Outcome, Status};
use crate::storage::{FileError, FileStore, PathLocks};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, warn};

/// Executes file commands.
///
/// Cloning is cheap; all clones share the same store and lock table, so
/// one handler per connection still serializes access to a path.
#[derive(Clone, Debug)]
pub struct CommandHandler {
    /// The filesystem collaborator
    store: Arc<FileStore>,
    /// Per-path locks shared by every connection
    locks: Arc<PathLocks>,
}

impl CommandHandler {
    /// Creates a new command handler.
    pub fn new(store: Arc<FileStore>, locks: Arc<PathLocks>) -> Self {
        Self { store, locks }
    }

    /// Processes one raw request and returns its outcome.
    ///
    /// This is the single entry point from the connection layer. The
    /// request is trimmed, classified and handed to exactly one handler.
    /// An unrecognized keyword yields `400` without touching the
    /// filesystem.
    pub fn process_request(&self, request: &[u8]) -> Outcome {
        let line = trim_request(request);

        match parse_command(line) {
            Ok(command) => self.execute(command),
            Err(e) => {
                debug!(error = %e, status = %e.status(), "Rejected request");
                Outcome::failed(e.status())
            }
        }
    }

    /// Executes an already parsed command.
    pub fn execute(&self, command: Command) -> Outcome {
        debug!(command = %command.kind(), path = %command.path(), "Executing command");

        match command {
            Command::Get { path } => self.cmd_get(&path),
            Command::Create { path } => self.cmd_create(path),
            Command::Append { path, payload } => self.cmd_append(&path, payload),
            Command::Remove { path } => self.cmd_remove(path),
        }
    }

    /// GET path
    fn cmd_get(&self, path: &str) -> Outcome {
        let _guard = self.locks.read(path);

        match self.store.read(path) {
            Ok(contents) => {
                debug!(path = %path, size = contents.len(), "Read file");
                Outcome::Contents(contents)
            }
            Err(e) => failure(e),
        }
    }

    /// CREATE path
    fn cmd_create(&self, path: String) -> Outcome {
        let _guard = self.locks.write(&path);

        match self.store.create(&path) {
            Ok(()) => Outcome::Created(path),
            Err(e) => failure(e),
        }
    }

    /// APPEND path text
    fn cmd_append(&self, path: &str, payload: Bytes) -> Outcome {
        let _guard = self.locks.write(path);

        match self.store.append(path, &payload) {
            Ok(()) => {
                debug!(path = %path, bytes = payload.len(), "Appended to file");
                Outcome::Appended
            }
            Err(e) => failure(e),
        }
    }

    /// REMOVE path
    fn cmd_remove(&self, path: String) -> Outcome {
        let _guard = self.locks.write(&path);

        match self.store.remove(&path) {
            Ok(()) => Outcome::Removed(path),
            Err(e) => failure(e),
        }
    }

    /// Returns the filesystem collaborator.
    pub fn store(&self) -> &FileStore {
        &self.store
    }
}

/// Logs a filesystem failure and maps it to its status.
fn failure(err: FileError) -> Outcome {
    let status = match err {
        FileError::NotFound { .. } => Status::NotFound,
        FileError::Open { .. } | FileError::NotAFile { .. } | FileError::Io { .. } => {
            Status::InternalServerError
        }
    };
    warn!(error = %err, status = %status, "File operation failed");
    Outcome::failed(status)
}
