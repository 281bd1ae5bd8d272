//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use mockable::Clock;
use warden::domain::TokenService;
use warden::domain::ports::BlobStore;
use warden::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) tokens: Arc<TokenService>,
    pub(crate) blob_store: Arc<dyn BlobStore>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration without a database.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        tokens: Arc<TokenService>,
        blob_store: Arc<dyn BlobStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            bind_addr,
            tokens,
            blob_store,
            clock,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for the credential repository.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
