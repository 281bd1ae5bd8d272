//! Service settings loaded via OrthoConfig.
//!
//! Values come from CLI arguments, `WARDEN_*` environment variables and an
//! optional configuration file. The signing secret is deliberately not a
//! setting; see [`crate::inbound::http::token_config`].

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CONTENT_DIR: &str = "./content";
const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 5;

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT))
}

fn default_content_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CONTENT_DIR)
}

/// Process-level settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WARDEN")]
pub struct ServiceSettings {
    /// Listen address.
    #[ortho_config(default = default_bind_addr())]
    pub bind_addr: SocketAddr,
    /// Root directory of the blob store; created on startup.
    #[ortho_config(default = default_content_dir())]
    pub content_dir: PathBuf,
    /// PostgreSQL URL. Without one, credentials live in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = DEFAULT_DB_MAX_CONNECTIONS)]
    pub db_max_connections: u32,
    /// Seconds to wait for a pooled connection before failing.
    #[ortho_config(default = DEFAULT_DB_CONNECT_TIMEOUT_SECS)]
    pub db_connect_timeout_secs: u64,
    /// Token lifetime in seconds; `0` issues tokens without expiry.
    #[ortho_config(default = DEFAULT_TOKEN_TTL_SECS)]
    pub token_ttl_secs: u64,
}

impl ServiceSettings {
    /// Configured database URL, if any. Empty strings count as unset.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Pool checkout timeout.
    pub fn db_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.db_connect_timeout_secs)
    }

    /// Lifetime stamped on minted tokens; `None` when expiry is disabled.
    pub fn token_ttl(&self) -> Option<Duration> {
        match self.token_ttl_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
