//! Builders for HTTP state from server configuration.

use std::sync::Arc;

use tracing::warn;
use warden::domain::ports::CredentialRepository;
use warden::domain::{AccessGate, CredentialAuthenticator};
use warden::inbound::http::state::HttpState;
use warden::outbound::memory::InMemoryCredentialRepository;
use warden::outbound::persistence::DieselCredentialRepository;

use super::ServerConfig;

/// Database-backed credentials when a pool is configured, in-memory otherwise.
fn build_credential_repository(config: &ServerConfig) -> Arc<dyn CredentialRepository> {
    match &config.db_pool {
        Some(pool) => Arc::new(DieselCredentialRepository::new(
            pool.clone(),
            config.clock.clone(),
        )),
        None => {
            warn!("no database configured; credentials are kept in memory and lost on exit");
            Arc::new(InMemoryCredentialRepository::new())
        }
    }
}

pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let repository = build_credential_repository(config);
    HttpState::new(
        Arc::new(CredentialAuthenticator::new(
            repository,
            config.tokens.clone(),
        )),
        Arc::new(AccessGate::new(
            config.tokens.clone(),
            config.blob_store.clone(),
        )),
    )
}
