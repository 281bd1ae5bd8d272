//! Port for credential persistence.
//!
//! "No matching row" is a normal outcome and surfaces as `Ok(None)`; every
//! variant of [`CredentialRepositoryError`] is a fault.

use async_trait::async_trait;

use crate::domain::{Credential, CredentialId, StoredCredential};

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential repository adapters.
    pub enum CredentialRepositoryError {
        /// A credential with the same email already exists.
        Conflict { email: String } =>
            "credential for {email} already exists",
        /// Repository connection could not be established.
        Connection { message: String } =>
            "credential repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "credential repository query failed: {message}",
    }
}

/// Port for looking up and creating credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Find the credential registered under `email`.
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredential>, CredentialRepositoryError>;

    /// Find the credential whose email and password both match.
    async fn find_by_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<StoredCredential>, CredentialRepositoryError>;

    /// Persist a new credential and return its assigned identifier.
    async fn create(&self, credential: &Credential)
    -> Result<CredentialId, CredentialRepositoryError>;

    /// Record a successful login.
    async fn record_login(&self, id: CredentialId) -> Result<(), CredentialRepositoryError>;
}
