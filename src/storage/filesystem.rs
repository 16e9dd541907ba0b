//! File system storage backend
//!
//! Implements StorageBackend for native file system operations.
//!
//! ## Security
//!
//! Backend-relative paths containing a ".." component are rejected before
//! they are joined onto the base directory.

use super::{DirectoryListing, StorageBackend, StorageError, is_hidden};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::trace;

/// File system storage backend
pub struct FileSystemStorageBackend {
    base_path: PathBuf,
}

impl FileSystemStorageBackend {
    /// Create a new file system storage backend
    ///
    /// # Arguments
    ///
    /// * `base_path` - Project root; all paths handed to the backend are relative to it
    ///
    /// # Example
    ///
    /// ```rust
    /// use project_index_sdk::storage::filesystem::FileSystemStorageBackend;
    ///
    /// let backend = FileSystemStorageBackend::new("/work/jaffle_shop");
    /// ```
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Resolve a path relative to the base path with security checks.
    ///
    /// Only plain folder and file names are accepted: a `..` component (or a
    /// drive prefix) is rejected. The base path itself is taken as given.
    fn resolve_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path.trim_start_matches('/'));

        if relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir))
        {
            return Err(StorageError::PermissionDenied(format!(
                "Path traversal not allowed: {}",
                path
            )));
        }

        // Lexical check only: symlinked folders may resolve outside the base.
        Ok(self.base_path.join(relative))
    }
}

fn map_io_error(path: &str, e: std::io::Error, not_found: StorageError) -> StorageError {
    match e.kind() {
        std::io::ErrorKind::NotFound => not_found,
        std::io::ErrorKind::PermissionDenied => {
            StorageError::PermissionDenied(format!("{}: {}", path, e))
        }
        _ => StorageError::IoError(format!("{}: {}", path, e)),
    }
}

#[async_trait(?Send)]
impl StorageBackend for FileSystemStorageBackend {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full_path = self.resolve_path(path)?;

        fs::read(&full_path)
            .await
            .map_err(|e| map_io_error(path, e, StorageError::FileNotFound(path.to_string())))
    }

    async fn list_dir(&self, dir: &str) -> Result<DirectoryListing, StorageError> {
        let full_path = self.resolve_path(dir)?;

        let mut read_dir = fs::read_dir(&full_path).await.map_err(|e| {
            map_io_error(dir, e, StorageError::DirectoryNotFound(dir.to_string()))
        })?;

        let mut listing = DirectoryListing::default();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| StorageError::IoError(format!("Failed to read directory entry: {}", e)))?
        {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if is_hidden(&name) {
                continue;
            }

            // metadata() follows symlinks, so a linked folder counts as a directory
            let metadata = fs::metadata(entry.path())
                .await
                .map_err(|e| map_io_error(&name, e, StorageError::FileNotFound(name.clone())))?;
            if metadata.is_dir() {
                listing.directories.push(name);
            } else if metadata.is_file() {
                listing.files.push(name);
            } else {
                trace!(entry = %name, "Skipping entry that is neither file nor directory");
            }
        }

        listing.directories.sort();
        listing.files.sort();
        Ok(listing)
    }
}
