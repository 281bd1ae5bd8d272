//! warden entry-point: loads settings and the signing secret, wires adapters
//! and starts the HTTP server.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use warden::domain::TokenService;
use warden::inbound::http::health::HealthState;
use warden::inbound::http::token_config::{BuildMode, token_secret_from_env};
use warden::outbound::blob::CapStdBlobStore;
use warden::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use warden::settings::ServiceSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServiceSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;

    let secret = token_secret_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let tokens = TokenService::new(&secret, clock.clone()).with_ttl(settings.token_ttl());
    drop(secret);

    let blob_store = CapStdBlobStore::open(&settings.content_dir).map_err(|e| {
        std::io::Error::other(format!(
            "failed to open content directory {}: {e}",
            settings.content_dir.display()
        ))
    })?;

    let mut config = ServerConfig::new(
        settings.bind_addr,
        Arc::new(tokens),
        Arc::new(blob_store),
        clock,
    );
    if let Some(url) = settings.database_url() {
        let pool_config = PoolConfig::new(url)
            .with_max_size(settings.db_max_connections)
            .with_connection_timeout(settings.db_connect_timeout());
        config = config.with_db_pool(connect(url, pool_config).await?);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(addr = %settings.bind_addr, "listening");
    server.await
}

/// Apply pending migrations, then open the async pool.
async fn connect(url: &str, pool_config: PoolConfig) -> std::io::Result<DbPool> {
    let migration_url = url.to_owned();
    tokio::task::spawn_blocking(move || run_migrations(&migration_url))
        .await
        .map_err(|e| std::io::Error::other(format!("migration task failed: {e}")))?
        .map_err(std::io::Error::other)?;
    DbPool::new(pool_config)
        .await
        .map_err(std::io::Error::other)
}
