//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain services and remain testable with in-memory adapters.

use std::sync::Arc;

use crate::domain::{AccessGate, CredentialAuthenticator};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub authenticator: Arc<CredentialAuthenticator>,
    pub gate: Arc<AccessGate>,
}

impl HttpState {
    pub fn new(authenticator: Arc<CredentialAuthenticator>, gate: Arc<AccessGate>) -> Self {
        Self {
            authenticator,
            gate,
        }
    }
}
