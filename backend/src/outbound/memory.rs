//! In-process adapters.
//!
//! Used when no database is configured and by the HTTP integration tests.
//! State lives for the lifetime of the process only.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    Blob, BlobStore, BlobStoreError, CredentialRepository, CredentialRepositoryError,
};
use crate::domain::{BlobName, Credential, CredentialId, StoredCredential};
use crate::outbound::persistence::password_digest;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug)]
struct Record {
    id: CredentialId,
    digest: String,
    logins: u32,
}

#[derive(Debug, Default)]
struct Credentials {
    by_email: HashMap<String, Record>,
    next_id: i32,
}

/// Credential repository backed by a hash map.
#[derive(Debug, Default)]
pub struct InMemoryCredentialRepository {
    state: Mutex<Credentials>,
}

impl InMemoryCredentialRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded logins for `email`, if registered.
    pub fn login_count(&self, email: &str) -> Option<u32> {
        lock(&self.state).by_email.get(email).map(|record| record.logins)
    }
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialRepository {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredential>, CredentialRepositoryError> {
        Ok(lock(&self.state)
            .by_email
            .get(email)
            .map(|record| StoredCredential {
                id: record.id,
                email: email.to_owned(),
            }))
    }

    async fn find_by_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<StoredCredential>, CredentialRepositoryError> {
        let presented = password_digest(email, password);
        Ok(lock(&self.state)
            .by_email
            .get(email)
            .filter(|record| record.digest == presented)
            .map(|record| StoredCredential {
                id: record.id,
                email: email.to_owned(),
            }))
    }

    async fn create(
        &self,
        credential: &Credential,
    ) -> Result<CredentialId, CredentialRepositoryError> {
        let mut state = lock(&self.state);
        if state.by_email.contains_key(credential.email()) {
            return Err(CredentialRepositoryError::conflict(credential.email()));
        }
        state.next_id += 1;
        let id = CredentialId::new(state.next_id)
            .map_err(|err| CredentialRepositoryError::query(err.to_string()))?;
        state.by_email.insert(
            credential.email().to_owned(),
            Record {
                id,
                digest: password_digest(credential.email(), credential.password()),
                logins: 0,
            },
        );
        Ok(id)
    }

    async fn record_login(&self, id: CredentialId) -> Result<(), CredentialRepositoryError> {
        let mut state = lock(&self.state);
        if let Some(record) = state.by_email.values_mut().find(|record| record.id == id) {
            record.logins += 1;
        }
        Ok(())
    }
}

/// Blob store backed by a hash map.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    blobs: Mutex<HashMap<BlobName, Vec<u8>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names currently stored, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = lock(&self.blobs)
            .keys()
            .map(|name| name.as_str().to_owned())
            .collect();
        names.sort();
        names
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn write(&self, name: &BlobName, content: &[u8]) -> Result<(), BlobStoreError> {
        lock(&self.blobs).insert(name.clone(), content.to_vec());
        Ok(())
    }

    async fn read(&self, name: &BlobName) -> Result<Blob, BlobStoreError> {
        lock(&self.blobs)
            .get(name)
            .map(|content| Blob::new(content.clone()))
            .ok_or_else(|| BlobStoreError::not_found(name.as_str()))
    }

    async fn delete(&self, name: &BlobName) -> Result<(), BlobStoreError> {
        lock(&self.blobs)
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| BlobStoreError::not_found(name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn credentials_match_only_with_the_right_password() {
        let repo = InMemoryCredentialRepository::new();
        let id = repo
            .create(&Credential::new("a@b.io", "secret"))
            .await
            .expect("create");
        assert_eq!(id.get(), 1);

        let hit = repo
            .find_by_email_and_password("a@b.io", "secret")
            .await
            .expect("lookup");
        assert_eq!(hit.map(|found| found.id), Some(id));
        let miss = repo
            .find_by_email_and_password("a@b.io", "wrong")
            .await
            .expect("lookup");
        assert_eq!(miss, None);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_emails_conflict() {
        let repo = InMemoryCredentialRepository::new();
        repo.create(&Credential::new("a@b.io", "one")).await.expect("create");
        let err = repo
            .create(&Credential::new("a@b.io", "two"))
            .await
            .expect_err("conflict");
        assert_eq!(err, CredentialRepositoryError::conflict("a@b.io"));
    }

    #[rstest]
    #[tokio::test]
    async fn record_login_counts_logins() {
        let repo = InMemoryCredentialRepository::new();
        let id = repo.create(&Credential::new("a@b.io", "pw")).await.expect("create");
        repo.record_login(id).await.expect("record");
        repo.record_login(id).await.expect("record");
        assert_eq!(repo.login_count("a@b.io"), Some(2));
    }

    #[rstest]
    #[tokio::test]
    async fn blobs_round_trip_and_delete() {
        let store = InMemoryBlobStore::new();
        let name = BlobName::parse("x.bin").expect("name");
        store.write(&name, &[1, 2, 3]).await.expect("write");
        assert_eq!(store.read(&name).await.expect("read").size, 3);
        assert_eq!(store.names(), vec!["x.bin".to_owned()]);
        store.delete(&name).await.expect("delete");
        assert!(matches!(
            store.delete(&name).await,
            Err(BlobStoreError::NotFound { .. })
        ));
    }
}
