//! Storage Module
//!
//! The filesystem is the only persistent store of FlashFS. This module wraps
//! the handful of filesystem actions the protocol needs and the lock table
//! that keeps concurrent requests on the same path from interleaving.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CommandHandler                          │
//! │                                                             │
//! │   ┌───────────────────┐        ┌────────────────────────┐   │
//! │   │    PathLocks      │        │      FileStore         │   │
//! │   │  64 RwLock shards │──────> │ read/create/append/rm  │   │
//! │   └───────────────────┘        └───────────┬────────────┘   │
//! └────────────────────────────────────────────┼────────────────┘
//!                                              ▼
//!                                          filesystem
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use flashfs::storage::{FileStore, PathLocks};
//!
//! let store = FileStore::new();
//! let locks = PathLocks::new();
//!
//! let _guard = locks.write("notes.txt");
//! store.create("notes.txt").unwrap();
//! store.append("notes.txt", b"hello").unwrap();
//! ```

pub mod files;
pub mod locks;

// Re-export commonly used types
pub use files::{FileError, FileStats, FileStore};
pub use locks::PathLocks;
