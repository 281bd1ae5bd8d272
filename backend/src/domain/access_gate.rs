//! Token- and name-checked access to the blob store.
//!
//! Every operation authorises the presented token and sanitises the requested
//! name before the blob store is touched; either failure returns without a
//! collaborator call. Denials carry no detail: all token failures read as
//! "forbidden" and all name failures as "unavailable".

use std::sync::Arc;

use tracing::{debug, error};

use crate::domain::content_type;
use crate::domain::ports::{BlobStore, BlobStoreError};
use crate::domain::token::{Claims, TokenService};
use crate::domain::{BlobName, Error};

const NOT_FOUND: &str = "file not found";
const STORE_FAILED: &str = "please try again in a few minutes";

/// A fetched blob with its sniffed media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedBlob {
    pub name: BlobName,
    pub content: Vec<u8>,
    pub size: u64,
    pub content_type: &'static str,
}

/// Gate between bearer-authenticated callers and the blob store.
#[derive(Clone)]
pub struct AccessGate {
    tokens: Arc<TokenService>,
    store: Arc<dyn BlobStore>,
}

impl AccessGate {
    pub fn new(tokens: Arc<TokenService>, store: Arc<dyn BlobStore>) -> Self {
        Self { tokens, store }
    }

    /// Verify a presented token. An absent token is denied like an invalid one.
    pub fn authorize(&self, token: Option<&str>) -> Result<Claims, Error> {
        let token = token.map(str::trim).filter(|token| !token.is_empty());
        let Some(token) = token else {
            debug!("request carried no token");
            return Err(Error::forbidden());
        };
        self.tokens.verify(token).map_err(|err| {
            debug!(reason = %err, "token rejected");
            Error::forbidden()
        })
    }

    /// Check a requested name before any store call.
    pub fn sanitize_name(&self, raw: &str) -> Result<BlobName, Error> {
        BlobName::parse(raw).map_err(|err| {
            debug!(reason = %err, "blob name rejected");
            Error::unavailable()
        })
    }

    /// Create or replace `name` with `content`.
    pub async fn put(&self, token: Option<&str>, name: &str, content: &[u8]) -> Result<BlobName, Error> {
        let claims = self.authorize(token)?;
        let name = self.sanitize_name(name)?;
        self.store
            .write(&name, content)
            .await
            .map_err(store_error)?;
        debug!(owner = %claims.email, blob = %name, size = content.len(), "blob written");
        Ok(name)
    }

    /// Read `name`, sniffing its media type from the leading bytes.
    pub async fn fetch(&self, token: Option<&str>, name: &str) -> Result<FetchedBlob, Error> {
        self.authorize(token)?;
        let name = self.sanitize_name(name)?;
        let blob = self.store.read(&name).await.map_err(store_error)?;
        let content_type = content_type::sniff(&blob.content);
        Ok(FetchedBlob {
            name,
            content: blob.content,
            size: blob.size,
            content_type,
        })
    }

    /// Delete `name`.
    pub async fn remove(&self, token: Option<&str>, name: &str) -> Result<(), Error> {
        let claims = self.authorize(token)?;
        let name = self.sanitize_name(name)?;
        self.store.delete(&name).await.map_err(store_error)?;
        debug!(owner = %claims.email, blob = %name, "blob deleted");
        Ok(())
    }
}

fn store_error(err: BlobStoreError) -> Error {
    match err {
        BlobStoreError::NotFound { .. } => Error::not_found(NOT_FOUND),
        BlobStoreError::Io { .. } => {
            error!(error = %err, "blob store failed");
            Error::internal(STORE_FAILED)
        }
    }
}

#[cfg(test)]
mod tests;
