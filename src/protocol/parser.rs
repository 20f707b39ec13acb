//! Request Line Parser
//!
//! This module turns the raw bytes a client sent into a typed [`Command`].
//! It never touches the filesystem: everything it rejects is a protocol
//! error, decided from the request line alone.
//!
//! ## Stages
//!
//! 1. **Trim**: strip trailing whitespace and control bytes (`\r\n`, tabs, ...)
//! 2. **Classify**: compare the leading characters against the four keywords
//! 3. **Extract**: slice the arguments at the keyword's fixed offset
//!
//! ## Argument Layout
//!
//! Arguments start right after the keyword and one separator, so the path of
//! `GET notes.txt` begins at byte 4 and the path of `CREATE notes.txt` at
//! byte 7. Paths are taken verbatim.
//!
//! `APPEND` splits its arguments at the first space: the path comes before
//! it and may not contain spaces, the text is everything after it, spaces
//! included.
//!
//! ```text
//! APPEND notes.txt  hello world
//!        ^^^^^^^^^ ^^^^^^^^^^^^
//!        path      text (" hello world")
//! ```

use crate::protocol::types::{Command, CommandKind, Status};
use bytes::Bytes;
use thiserror::Error;

/// Errors that can occur while parsing a request line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The leading token is not one of the four keywords
    #[error("unrecognized command")]
    UnknownCommand,

    /// The keyword was not followed by a path
    #[error("missing path in {0} request")]
    MissingPath(CommandKind),

    /// An `APPEND` line has no space between path and text
    #[error("missing text in APPEND request")]
    MissingText,

    /// The path is not valid UTF-8
    #[error("invalid UTF-8 in path: {0}")]
    InvalidUtf8(String),
}

impl ParseError {
    /// The protocol status this error is reported with.
    pub fn status(&self) -> Status {
        match self {
            ParseError::UnknownCommand => Status::BadRequest,
            ParseError::MissingPath(_) | ParseError::MissingText | ParseError::InvalidUtf8(_) => {
                Status::UnprocessableEntity
            }
        }
    }
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Matches the bytes C's `isspace` accepts.
#[inline]
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// Strips trailing whitespace from a request buffer.
///
/// An empty or all-whitespace buffer yields an empty slice.
pub fn trim_request(buf: &[u8]) -> &[u8] {
    let end = buf
        .iter()
        .rposition(|&b| !is_space(b))
        .map_or(0, |pos| pos + 1);
    &buf[..end]
}

/// Identifies the command keyword at the start of a trimmed line.
///
/// Keywords are compared case-insensitively on their first
/// [`CommandKind::match_len`] characters, in [`CommandKind::ALL`] order.
pub fn classify(line: &[u8]) -> Option<CommandKind> {
    CommandKind::ALL.into_iter().find(|kind| {
        let n = kind.match_len();
        line.len() >= n && line[..n].eq_ignore_ascii_case(&kind.keyword().as_bytes()[..n])
    })
}

/// Parses a trimmed request line into a [`Command`].
pub fn parse_command(line: &[u8]) -> ParseResult<Command> {
    let kind = classify(line).ok_or(ParseError::UnknownCommand)?;
    let offset = kind.args_offset();

    if line.len() <= offset {
        return Err(ParseError::MissingPath(kind));
    }
    let args = &line[offset..];

    match kind {
        CommandKind::Get => Ok(Command::Get {
            path: path_from(args)?,
        }),
        CommandKind::Create => Ok(Command::Create {
            path: path_from(args)?,
        }),
        CommandKind::Remove => Ok(Command::Remove {
            path: path_from(args)?,
        }),
        CommandKind::Append => {
            let sep = args
                .iter()
                .position(|&b| b == b' ')
                .ok_or(ParseError::MissingText)?;
            if sep == 0 {
                return Err(ParseError::MissingPath(kind));
            }
            let text = &args[sep + 1..];
            if text.is_empty() {
                return Err(ParseError::MissingText);
            }
            Ok(Command::Append {
                path: path_from(&args[..sep])?,
                payload: Bytes::copy_from_slice(text),
            })
        }
    }
}

fn path_from(bytes: &[u8]) -> ParseResult<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| ParseError::InvalidUtf8(e.to_string()))
}
