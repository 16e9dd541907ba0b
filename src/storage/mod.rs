//! Storage backend abstraction
//!
//! Defines the StorageBackend trait used to read a project tree, and the
//! FileSystemStorageBackend implementation for native file systems.

use async_trait::async_trait;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

/// Immediate entries of one directory, split by kind.
///
/// Hidden entries (names beginning with `.`) are never listed. Both lists are
/// sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryListing {
    pub directories: Vec<String>,
    pub files: Vec<String>,
}

impl DirectoryListing {
    pub fn has_file(&self, name: &str) -> bool {
        self.files.iter().any(|f| f == name)
    }
}

/// Trait for storage backends
///
/// Paths are `/`-separated and relative to the backend's root. The empty string
/// names the root itself.
#[async_trait(?Send)]
pub trait StorageBackend: Send + Sync {
    /// Read a file from storage
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// List the immediate files and subdirectories of a directory
    ///
    /// Every entry's kind is resolved before it is classified. Entries that are
    /// neither regular files nor directories are dropped.
    async fn list_dir(&self, dir: &str) -> Result<DirectoryListing, StorageError>;
}

/// Join a child name onto a backend-relative directory path.
pub fn join_path(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}

/// Whether a directory entry name is hidden.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

// Storage backend implementations
#[cfg(feature = "native-fs")]
pub mod filesystem;
