//! Port for named binary content.

use async_trait::async_trait;

use crate::domain::BlobName;

use super::define_port_error;

define_port_error! {
    /// Errors raised by blob store adapters.
    pub enum BlobStoreError {
        /// No blob is stored under the requested name.
        NotFound { name: String } => "blob {name} not found",
        /// The backing store failed.
        Io { message: String } => "blob store failed: {message}",
    }
}

/// Stored content together with its size in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub content: Vec<u8>,
    pub size: u64,
}

impl Blob {
    pub fn new(content: Vec<u8>) -> Self {
        let size = content.len() as u64;
        Self { content, size }
    }
}

/// Port for writing, reading and deleting blobs.
///
/// Implementations only ever receive sanitised names. Concurrent writes to
/// the same name resolve as last write wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Create or replace the blob stored under `name`.
    async fn write(&self, name: &BlobName, content: &[u8]) -> Result<(), BlobStoreError>;

    /// Read the blob stored under `name`.
    async fn read(&self, name: &BlobName) -> Result<Blob, BlobStoreError>;

    /// Delete the blob stored under `name`.
    async fn delete(&self, name: &BlobName) -> Result<(), BlobStoreError>;
}
