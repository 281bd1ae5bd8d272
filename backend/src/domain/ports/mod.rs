//! Driven ports for the hexagonal boundary.
//!
//! Adapters under `crate::outbound` implement these traits; the domain only
//! ever holds them as `Arc<dyn Trait>`.

mod macros;
pub(crate) use macros::define_port_error;

mod blob_store;
mod credential_repository;

#[cfg(test)]
pub use blob_store::MockBlobStore;
pub use blob_store::{Blob, BlobStore, BlobStoreError};
#[cfg(test)]
pub use credential_repository::MockCredentialRepository;
pub use credential_repository::{CredentialRepository, CredentialRepositoryError};
