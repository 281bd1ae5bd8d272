//! `BlobStore` over a `cap_std` directory capability.
//!
//! The content directory is opened once; every operation resolves names
//! relative to that capability, so no path can reach outside it. Filesystem
//! calls are blocking and run on tokio's blocking pool.

use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::debug;

use crate::domain::BlobName;
use crate::domain::ports::{Blob, BlobStore, BlobStoreError};

/// Blob store rooted at a single directory.
#[derive(Clone)]
pub struct CapStdBlobStore {
    dir: Arc<Dir>,
}

impl CapStdBlobStore {
    /// Create `root` if needed and open it as the store's capability.
    ///
    /// # Errors
    /// Propagates the I/O error when the directory cannot be created or
    /// opened.
    pub fn open(root: &Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        Ok(Self::from_dir(dir))
    }

    /// Wrap an already opened directory capability.
    pub fn from_dir(dir: Dir) -> Self {
        Self { dir: Arc::new(dir) }
    }

    async fn run<T, F>(&self, name: &BlobName, op: F) -> Result<T, BlobStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Dir, &Path) -> io::Result<T> + Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        let owned = name.as_str().to_owned();
        let outcome = tokio::task::spawn_blocking(move || op(&dir, Path::new(&owned)))
            .await
            .map_err(|err| BlobStoreError::io(format!("blocking task failed: {err}")))?;
        outcome.map_err(|err| map_io_error(name, &err))
    }
}

fn map_io_error(name: &BlobName, error: &io::Error) -> BlobStoreError {
    if error.kind() == io::ErrorKind::NotFound {
        return BlobStoreError::not_found(name.as_str());
    }
    debug!(blob = %name, kind = ?error.kind(), "blob io failed");
    BlobStoreError::io(error.to_string())
}

#[async_trait]
impl BlobStore for CapStdBlobStore {
    async fn write(&self, name: &BlobName, content: &[u8]) -> Result<(), BlobStoreError> {
        let content = content.to_vec();
        self.run(name, move |dir, path| dir.write(path, &content))
            .await
    }

    async fn read(&self, name: &BlobName) -> Result<Blob, BlobStoreError> {
        self.run(name, |dir, path| dir.read(path))
            .await
            .map(Blob::new)
    }

    async fn delete(&self, name: &BlobName) -> Result<(), BlobStoreError> {
        self.run(name, |dir, path| dir.remove_file(path)).await
    }
}
