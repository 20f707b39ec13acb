//! Line Protocol Implementation
//!
//! This module implements the plain-text request protocol of FlashFS.
//!
//! ## Overview
//!
//! A client sends one line, such as `GET notes.txt`, and receives either the
//! file contents or a short status line. Each connection carries exactly one
//! request.
//!
//! ## Modules
//!
//! - `types`: `Command`, `Status` and `Outcome`
//! - `parser`: trimming, keyword classification and argument extraction
//! - `encoder`: reply bytes for each outcome
//!
//! ## Example
//!
//! ```
//! use flashfs::protocol::{parse_command, trim_request, Command};
//!
//! let line = trim_request(b"CREATE notes.txt\r\n");
//! let command = parse_command(line).unwrap();
//! assert_eq!(command, Command::Create { path: "notes.txt".to_string() });
//! ```

pub mod encoder;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use encoder::{encode, send_err, send_response, EncodeError};
pub use parser::{classify, parse_command, trim_request, ParseError, ParseResult};
pub use types::{Command, CommandKind, Outcome, Status};
