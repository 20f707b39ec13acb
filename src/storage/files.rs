//! Filesystem Access
//!
//! `FileStore` performs the single filesystem action behind each command.
//! Paths are used exactly as the client sent them: relative paths resolve
//! against the server's working directory, and no sanitization is done.
//!
//! Every file handle is scoped to one call and closed before it returns,
//! on success and on error.

use bytes::Bytes;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Errors that can occur while touching the filesystem.
#[derive(Debug, Error)]
pub enum FileError {
    /// The target file does not exist or cannot be opened for reading
    #[error("file not found: '{path}'")]
    NotFound { path: String },

    /// The target file exists but could not be opened for writing
    #[error("could not open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The path names something other than a regular file
    #[error("not a regular file: '{path}'")]
    NotAFile { path: String },

    /// A read, write or delete failed
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Statistics about filesystem operations.
#[derive(Debug, Clone, Default)]
pub struct FileStats {
    pub reads: u64,
    pub creates: u64,
    pub appends: u64,
    pub removes: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
}

/// Performs file reads, creations, appends and deletions.
#[derive(Debug, Default)]
pub struct FileStore {
    reads: AtomicU64,
    creates: AtomicU64,
    appends: AtomicU64,
    removes: AtomicU64,
    bytes_read: AtomicU64,
    bytes_written: AtomicU64,
}

impl FileStore {
    /// Creates a new file store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a whole file.
    ///
    /// The size is queried first and the buffer is allocated to exactly
    /// that size. Directories and other non-regular files are refused.
    pub fn read(&self, path: &str) -> Result<Bytes, FileError> {
        let mut file = File::open(path).map_err(|_| FileError::NotFound {
            path: path.to_string(),
        })?;

        let io_err = |source: io::Error| FileError::Io {
            path: path.to_string(),
            source,
        };

        let metadata = file.metadata().map_err(io_err)?;
        if !metadata.is_file() {
            return Err(FileError::NotAFile {
                path: path.to_string(),
            });
        }

        let size = metadata.len() as usize;
        let mut buf = vec![0u8; size];
        file.read_exact(&mut buf).map_err(io_err)?;

        self.reads.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(size as u64, Ordering::Relaxed);
        Ok(Bytes::from(buf))
    }

    /// Creates a file, truncating any existing content.
    pub fn create(&self, path: &str) -> Result<(), FileError> {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|source| FileError::Open {
                path: path.to_string(),
                source,
            })?;

        self.creates.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Appends `data` to the end of an existing file.
    ///
    /// The file is never created here.
    pub fn append(&self, path: &str, data: &[u8]) -> Result<(), FileError> {
        if !self.exists(path) {
            return Err(FileError::NotFound {
                path: path.to_string(),
            });
        }

        let mut file = OpenOptions::new()
            .append(true)
            .open(path)
            .map_err(|source| FileError::Open {
                path: path.to_string(),
                source,
            })?;

        file.write_all(data)
            .and_then(|_| file.flush())
            .map_err(|source| FileError::Io {
                path: path.to_string(),
                source,
            })?;

        self.appends.fetch_add(1, Ordering::Relaxed);
        self.bytes_written
            .fetch_add(data.len() as u64, Ordering::Relaxed);
        Ok(())
    }

    /// Deletes a file.
    ///
    /// Every failure, including a missing file, is an I/O error.
    pub fn remove(&self, path: &str) -> Result<(), FileError> {
        fs::remove_file(path).map_err(|source| FileError::Io {
            path: path.to_string(),
            source,
        })?;

        self.removes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Returns true if `path` exists.
    pub fn exists(&self, path: &str) -> bool {
        Path::new(path).exists()
    }

    /// Returns a snapshot of the operation counters.
    pub fn stats(&self) -> FileStats {
        FileStats {
            reads: self.reads.load(Ordering::Relaxed),
            creates: self.creates.load(Ordering::Relaxed),
            appends: self.appends.load(Ordering::Relaxed),
            removes: self.removes.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn path_in(dir: &tempfile::TempDir, name: &str) -> String {
        dir.path().join(name).to_string_lossy().into_owned()
    }

    #[test]
    fn test_read_exact_contents() {
        let dir = tempdir().unwrap();
        let path = path_in(&dir, "data.bin");
        let contents = b"binary\x00data\xff\n".to_vec();
        fs::write(&path, &contents).unwrap();

        let store = FileStore::new();
        let data = store.read(&path).unwrap();
        assert_eq!(&data[..], &contents[..]);
        assert_eq!(store.stats().bytes_read, contents.len() as u64);
    }

    #[test]
    fn test_read_empty_file() {
        let dir = tempdir().unwrap();
        let path = path_in(&dir, "empty");
        fs::write(&path, b"").unwrap();

        let store = FileStore::new();
        assert!(store.read(&path).unwrap().is_empty());
    }

    #[test]
    fn test_read_missing() {
        let dir = tempdir().unwrap();
        let store = FileStore::new();
        let result = store.read(&path_in(&dir, "missing"));
        assert!(matches!(result, Err(FileError::NotFound { .. })));
    }

    #[test]
    fn test_read_directory() {
        let dir = tempdir().unwrap();
        let store = FileStore::new();
        let result = store.read(&dir.path().to_string_lossy());
        assert!(matches!(result, Err(FileError::NotAFile { .. })));
        assert_eq!(store.stats().reads, 0);
    }

    #[test]
    fn test_create_truncates() {
        let dir = tempdir().unwrap();
        let path = path_in(&dir, "notes.txt");
        fs::write(&path, b"old content").unwrap();

        let store = FileStore::new();
        store.create(&path).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_create_in_missing_directory() {
        let dir = tempdir().unwrap();
        let store = FileStore::new();
        let result = store.create(&path_in(&dir, "no/such/dir/file"));
        assert!(matches!(result, Err(FileError::Open { .. })));
    }

    #[test]
    fn test_append_existing() {
        let dir = tempdir().unwrap();
        let path = path_in(&dir, "log.txt");
        fs::write(&path, b"one").unwrap();

        let store = FileStore::new();
        store.append(&path, b" two").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"one two");
        assert_eq!(store.stats().appends, 1);
        assert_eq!(store.stats().bytes_written, 4);
    }

    #[test]
    fn test_append_missing_does_not_create() {
        let dir = tempdir().unwrap();
        let path = path_in(&dir, "log.txt");

        let store = FileStore::new();
        let result = store.append(&path, b"data");
        assert!(matches!(result, Err(FileError::NotFound { .. })));
        assert!(!Path::new(&path).exists());
    }

    #[test]
    fn test_remove() {
        let dir = tempdir().unwrap();
        let path = path_in(&dir, "gone.txt");
        fs::write(&path, b"x").unwrap();

        let store = FileStore::new();
        store.remove(&path).unwrap();
        assert!(!store.exists(&path));

        let result = store.remove(&path);
        assert!(matches!(result, Err(FileError::Io { .. })));
        assert_eq!(store.stats().removes, 1);
    }
}
