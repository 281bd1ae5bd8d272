//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories only translate between Diesel rows and domain types. Row
//! structs (`models.rs`) and table definitions (`schema.rs`) stay private to
//! this module; every database error is mapped to the port's error type.
//!
//! # Example
//!
//! ```ignore
//! use warden::outbound::persistence::{DbPool, DieselCredentialRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/warden")).await?;
//! let repo = DieselCredentialRepository::new(pool, clock);
//! ```

mod diesel_credential_repository;
mod models;
mod pool;
mod schema;

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

pub use diesel_credential_repository::DieselCredentialRepository;
pub(crate) use diesel_credential_repository::password_digest;
pub use pool::{DbPool, PoolConfig, PoolError};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    #[error("failed to connect for migrations: {message}")]
    Connect { message: String },
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
}

/// Apply every pending embedded migration.
///
/// Uses a synchronous connection; call it from `spawn_blocking`.
pub fn run_migrations(database_url: &str) -> Result<(), MigrationError> {
    let mut conn = PgConnection::establish(database_url).map_err(|err| MigrationError::Connect {
        message: err.to_string(),
    })?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    Ok(())
}
