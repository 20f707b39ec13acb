//! Per-Path Lock Table
//!
//! Connections run on independent tasks, so two requests on the same file
//! could otherwise interleave at the filesystem level (two `APPEND`s mixing
//! their bytes, a `CREATE` truncating under a `GET`). The lock table
//! serializes them.
//!
//! ## Design
//!
//! Paths map onto a fixed number of lock shards:
//!
//! ```text
//! "notes.txt" ──hash──> shard 17 ─┐
//! "log.txt"   ──hash──> shard 42  │   Vec<RwLock<()>>
//! "notes.txt" ──hash──> shard 17 ─┘   (64 shards)
//! ```
//!
//! Readers (`GET`) share a shard; writers (`CREATE`, `APPEND`, `REMOVE`)
//! hold it exclusively. Unrelated paths that hash to the same shard are
//! serialized too.
//!
//! Locks are keyed by the path *string*: `notes.txt` and `./notes.txt` are
//! different keys even though they name the same file.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Number of lock shards.
const NUM_SHARDS: usize = 64;

/// A striped reader/writer lock table keyed by path.
pub struct PathLocks {
    shards: Vec<RwLock<()>>,
}

impl std::fmt::Debug for PathLocks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathLocks")
            .field("shards", &self.shards.len())
            .finish()
    }
}

impl Default for PathLocks {
    fn default() -> Self {
        Self::new()
    }
}

impl PathLocks {
    /// Creates a lock table with the default number of shards.
    pub fn new() -> Self {
        let shards = (0..NUM_SHARDS).map(|_| RwLock::new(())).collect();
        Self { shards }
    }

    /// Determines which shard a path belongs to.
    #[inline]
    fn shard_index(&self, path: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        path.hash(&mut hasher);
        (hasher.finish() as usize) % self.shards.len()
    }

    /// Takes the shared lock for `path`.
    pub fn read(&self, path: &str) -> RwLockReadGuard<'_, ()> {
        // The guarded value is `()`, so a poisoned lock carries no broken state.
        self.shards[self.shard_index(path)]
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes the exclusive lock for `path`.
    pub fn write(&self, path: &str) -> RwLockWriteGuard<'_, ()> {
        self.shards[self.shard_index(path)]
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_same_path_same_shard() {
        let locks = PathLocks::new();
        assert_eq!(locks.shard_index("notes.txt"), locks.shard_index("notes.txt"));
        assert!(locks.shard_index("notes.txt") < NUM_SHARDS);
    }

    #[test]
    fn test_writer_excludes_other_access() {
        let locks = PathLocks::new();
        let idx = locks.shard_index("notes.txt");

        let _guard = locks.write("notes.txt");
        assert!(locks.shards[idx].try_write().is_err());
        assert!(locks.shards[idx].try_read().is_err());
    }

    #[test]
    fn test_readers_share() {
        let locks = PathLocks::new();
        let idx = locks.shard_index("notes.txt");

        let _first = locks.read("notes.txt");
        assert!(locks.shards[idx].try_read().is_ok());
        assert!(locks.shards[idx].try_write().is_err());
    }

    #[test]
    fn test_lock_released_on_drop() {
        let locks = Arc::new(PathLocks::new());

        {
            let _guard = locks.write("a");
        }

        let locks2 = Arc::clone(&locks);
        let handle = thread::spawn(move || {
            let _guard = locks2.write("a");
        });
        handle.join().unwrap();
    }
}
