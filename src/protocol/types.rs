//! Request and Response Types
//!
//! This module defines the typed values that flow through a single request:
//! the [`Command`] produced by the parser, the [`Status`] codes of the
//! protocol, and the [`Outcome`] a handler returns for the encoder.
//!
//! ## Wire Format
//!
//! Requests are one line of ASCII text, trailing whitespace ignored:
//!
//! ```text
//! GET <path>
//! CREATE <path>
//! APPEND <path> <text...>
//! REMOVE <path>
//! ```
//!
//! Replies are either the raw file contents (`GET`) or a short
//! human-readable status line. There is no framing: the server closes the
//! connection after writing the reply.

use bytes::Bytes;
use std::fmt;

/// Fixed reply for a successful `APPEND`.
pub const APPEND_OK: &str = "APPEND returned 200.";

/// The four operations a request line can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Get,
    Create,
    Append,
    Remove,
}

impl CommandKind {
    /// Classification order. The first keyword that matches wins.
    pub const ALL: [CommandKind; 4] = [
        CommandKind::Get,
        CommandKind::Create,
        CommandKind::Append,
        CommandKind::Remove,
    ];

    /// The canonical upper-case keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            CommandKind::Get => "GET",
            CommandKind::Create => "CREATE",
            CommandKind::Append => "APPEND",
            CommandKind::Remove => "REMOVE",
        }
    }

    /// Number of leading characters compared when classifying.
    ///
    /// This is the shortest prefix that tells the keywords apart, so
    /// `CREAT` is already a `CREATE`.
    pub fn match_len(self) -> usize {
        match self {
            CommandKind::Get => 3,
            CommandKind::Create => 5,
            CommandKind::Append | CommandKind::Remove => 6,
        }
    }

    /// Offset of the first argument byte: keyword plus one separator.
    pub fn args_offset(self) -> usize {
        self.keyword().len() + 1
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A classified and validated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Read a whole file.
    Get { path: String },

    /// Create a file, truncating it if it exists.
    Create { path: String },

    /// Append `payload` to an existing file.
    Append { path: String, payload: Bytes },

    /// Delete a file.
    Remove { path: String },
}

impl Command {
    /// Returns the kind of this command.
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Get { .. } => CommandKind::Get,
            Command::Create { .. } => CommandKind::Create,
            Command::Append { .. } => CommandKind::Append,
            Command::Remove { .. } => CommandKind::Remove,
        }
    }

    /// Returns the target path of this command.
    pub fn path(&self) -> &str {
        match self {
            Command::Get { path }
            | Command::Create { path }
            | Command::Append { path, .. }
            | Command::Remove { path } => path,
        }
    }
}

/// Protocol status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// 200
    Ok,
    /// 400: the command keyword was not recognized
    BadRequest,
    /// 404: the target file does not exist
    NotFound,
    /// 422: an argument is missing or malformed
    UnprocessableEntity,
    /// 500: the filesystem rejected the operation
    InternalServerError,
}

impl Status {
    /// Numeric code of this status.
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::UnprocessableEntity => 422,
            Status::InternalServerError => 500,
        }
    }

    /// The fixed error body for this status.
    ///
    /// Returns `None` for [`Status::Ok`], which has no error body.
    pub fn error_body(self) -> Option<&'static str> {
        match self {
            Status::Ok => None,
            Status::BadRequest => Some("400 - Bad Request"),
            Status::NotFound => Some("404 - Not Found"),
            Status::UnprocessableEntity => Some("422 - Unprocessable Entity"),
            Status::InternalServerError => Some("500 - Internal Server Error"),
        }
    }

    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The result of executing one command.
///
/// Successful variants carry exactly the payload the encoder needs.
/// A failure carries only its status, so a payload can never be read
/// from a failed outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `GET` succeeded. The size is `contents.len()`.
    Contents(Bytes),

    /// `CREATE` succeeded on the given path.
    Created(String),

    /// `APPEND` succeeded.
    Appended,

    /// `REMOVE` succeeded on the given path.
    Removed(String),

    /// The request failed with the given status.
    Failed(Status),
}

impl Outcome {
    /// Creates a failure outcome.
    pub fn failed(status: Status) -> Self {
        Outcome::Failed(status)
    }

    /// Returns the status of this outcome.
    pub fn status(&self) -> Status {
        match self {
            Outcome::Failed(status) => *status,
            _ => Status::Ok,
        }
    }

    /// Size of the file returned by a successful `GET`.
    pub fn size(&self) -> Option<usize> {
        match self {
            Outcome::Contents(data) => Some(data.len()),
            _ => None,
        }
    }
}
