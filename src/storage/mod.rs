mod error;

pub mod filesystem;

pub use error::StorageError;
pub use filesystem::FilesystemMediaStore;

use async_trait::async_trait;
use tokio::io::AsyncRead;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Path-addressed binary media storage.
///
/// Objects are keyed by a relative path such as `photos/<display_name>.jpg`.
/// Paths are validated against traversal before touching the filesystem.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store data from an async reader at the given media path.
    ///
    /// Returns the number of bytes written. Fails with
    /// [`StorageError::SizeLimitExceeded`] when the stream is larger than the
    /// configured limit; no partial object is left behind on failure.
    async fn save(
        &self,
        path: &str,
        reader: &mut (dyn AsyncRead + Unpin + Send),
    ) -> Result<u64, StorageError>;

    /// Open an object as a streaming async reader.
    async fn open(&self, path: &str) -> Result<BoxReader, StorageError>;

    /// Check whether an object exists.
    async fn exists(&self, path: &str) -> Result<bool, StorageError>;

    /// Delete an object.
    ///
    /// Returns `true` if the object was deleted, `false` if it did not exist.
    async fn delete(&self, path: &str) -> Result<bool, StorageError>;

    /// Get the size of an object in bytes.
    async fn size(&self, path: &str) -> Result<u64, StorageError>;
}
