use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};

use super::error::StorageError;
use super::{BoxReader, MediaStore};

/// Filesystem-backed media store.
///
/// Objects live under `{base_path}/{media path}`; writes go through a
/// temp file in `{base_path}/.tmp` followed by an atomic rename.
pub struct FilesystemMediaStore {
    base_path: PathBuf,
    max_size: u64,
}

impl FilesystemMediaStore {
    /// Create a new filesystem media store rooted at `base_path`.
    pub async fn new(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            max_size,
        })
    }

    /// Resolve a media path to a filesystem path, rejecting anything that
    /// could escape the store root.
    fn object_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        if path.is_empty() || path.starts_with('/') || path.contains('\\') || path.contains('\0') {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        for segment in path.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(StorageError::InvalidPath(path.to_string()));
            }
        }
        Ok(self.base_path.join(path))
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl MediaStore for FilesystemMediaStore {
    async fn save(
        &self,
        path: &str,
        reader: &mut (dyn AsyncRead + Unpin + Send),
    ) -> Result<u64, StorageError> {
        let object_path = self.object_path(path)?;
        let temp_path = self.temp_path();

        let mut temp_file = fs::File::create(&temp_path).await?;
        let mut total_bytes: u64 = 0;
        let mut buf = vec![0u8; 64 * 1024]; // 64KB read buffer

        loop {
            let n = match reader.read(&mut buf).await {
                Ok(n) => n,
                Err(e) => {
                    drop(temp_file);
                    let _ = fs::remove_file(&temp_path).await;
                    return Err(e.into());
                }
            };
            if n == 0 {
                break;
            }

            total_bytes += n as u64;
            if total_bytes > self.max_size {
                drop(temp_file);
                let _ = fs::remove_file(&temp_path).await;
                return Err(StorageError::SizeLimitExceeded {
                    actual: total_bytes,
                    limit: self.max_size,
                });
            }

            if let Err(e) = temp_file.write_all(&buf[..n]).await {
                drop(temp_file);
                let _ = fs::remove_file(&temp_path).await;
                return Err(e.into());
            }
        }

        temp_file.flush().await?;
        drop(temp_file);

        if let Some(parent) = object_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = fs::rename(&temp_path, &object_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(total_bytes)
    }

    async fn open(&self, path: &str) -> Result<BoxReader, StorageError> {
        let object_path = self.object_path(path)?;
        match fs::File::open(&object_path).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let object_path = self.object_path(path)?;
        Ok(fs::try_exists(&object_path).await?)
    }

    async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        let object_path = self.object_path(path)?;
        match fs::remove_file(&object_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn size(&self, path: &str) -> Result<u64, StorageError> {
        let object_path = self.object_path(path)?;
        match fs::metadata(&object_path).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
