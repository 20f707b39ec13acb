//! Server configuration
//!
//! All settings come from the command line.

use crate::{DEFAULT_BACKLOG, DEFAULT_HOST, DEFAULT_PORT, MAX_REQUEST_LEN};
use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone, Parser)]
#[command(name = "flashfs")]
#[command(version, about = "A minimal line-protocol file server", long_about = None)]
pub struct ServerConfig {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Maximum number of pending connections
    #[arg(short, long, default_value_t = DEFAULT_BACKLOG)]
    pub backlog: u32,

    /// Maximum request size in bytes
    #[arg(short, long, default_value_t = MAX_REQUEST_LEN)]
    pub max_request_len: usize,

    /// Directory client paths are resolved against (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            backlog: DEFAULT_BACKLOG,
            max_request_len: MAX_REQUEST_LEN,
            root: None,
            verbose: false,
        }
    }
}

impl ServerConfig {
    /// Returns the bind address as a string
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Rejects settings the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_request_len == 0 {
            bail!("--max-request-len must be greater than zero");
        }
        if self.backlog == 0 {
            bail!("--backlog must be greater than zero");
        }
        if let Some(root) = &self.root {
            if !root.is_dir() {
                bail!("root {:?} is not a directory", root);
            }
        }
        Ok(())
    }
}
