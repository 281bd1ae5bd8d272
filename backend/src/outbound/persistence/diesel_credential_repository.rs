//! PostgreSQL-backed `CredentialRepository` using Diesel.
//!
//! The plaintext password is not stored. `users.password_digest` holds one
//! SHA-256 pass over `email || 0x00 || password`, and the email/password
//! lookup compares digests. This is a fast hash, not a password-hashing KDF:
//! it keeps plaintext out of the table but does not slow offline guessing
//! against a leaked table.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::ports::{CredentialRepository, CredentialRepositoryError};
use crate::domain::{Credential, CredentialId, StoredCredential};

use super::models::{CredentialRow, LoginUpdate, NewCredentialRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `CredentialRepository` port.
#[derive(Clone)]
pub struct DieselCredentialRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselCredentialRepository {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

/// Hex digest stored in `users.password_digest`.
///
/// Single-round SHA-256; see the module docs for its limits.
pub(crate) fn password_digest(email: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update([0_u8]);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn map_pool_error(error: PoolError) -> CredentialRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            CredentialRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error, email: &str) -> CredentialRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            CredentialRepositoryError::conflict(email)
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            CredentialRepositoryError::connection("database connection error")
        }
        DieselError::QueryBuilderError(_) => {
            CredentialRepositoryError::query("database query error")
        }
        _ => CredentialRepositoryError::query("database error"),
    }
}

fn row_to_stored(row: CredentialRow) -> Result<StoredCredential, CredentialRepositoryError> {
    let id = CredentialId::new(row.id)
        .map_err(|err| CredentialRepositoryError::query(err.to_string()))?;
    Ok(StoredCredential {
        id,
        email: row.email,
    })
}

#[async_trait]
impl CredentialRepository for DieselCredentialRepository {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredential>, CredentialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(users::email.eq(email))
            .select(CredentialRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, email))?
            .map(row_to_stored)
            .transpose()
    }

    async fn find_by_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<StoredCredential>, CredentialRepositoryError> {
        let digest = password_digest(email, password);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(users::email.eq(email))
            .filter(users::password_digest.eq(&digest))
            .select(CredentialRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, email))?
            .map(row_to_stored)
            .transpose()
    }

    async fn create(
        &self,
        credential: &Credential,
    ) -> Result<CredentialId, CredentialRepositoryError> {
        let digest = password_digest(credential.email(), credential.password());
        let row = NewCredentialRow {
            email: credential.email(),
            password_digest: &digest,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id: i32 = diesel::insert_into(users::table)
            .values(&row)
            .returning(users::id)
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, credential.email()))?;
        CredentialId::new(id).map_err(|err| CredentialRepositoryError::query(err.to_string()))
    }

    async fn record_login(&self, id: CredentialId) -> Result<(), CredentialRepositoryError> {
        let update = LoginUpdate {
            last_login: Some(self.clock.utc()),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(users::table.filter(users::id.eq(id.get())))
            .set(&update)
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, ""))?;
        Ok(())
    }
}
