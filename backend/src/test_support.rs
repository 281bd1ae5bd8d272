//! Shared helpers for unit tests (in `src/`) and integration tests (in
//! `tests/`).

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::token::{Claims, TokenSecret, TokenService};
use crate::domain::{AccessGate, CredentialAuthenticator};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{InMemoryBlobStore, InMemoryCredentialRepository};

/// Secret used by test token services.
pub const TEST_SECRET: &[u8] = b"test-only signing secret, at least 32 bytes long";

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct FixtureClock(Mutex<DateTime<Utc>>);

impl FixtureClock {
    /// Clock frozen at `secs` seconds after the Unix epoch.
    pub fn at(secs: i64) -> Self {
        let instant = Utc.timestamp_opt(secs, 0).single().unwrap_or_default();
        Self(Mutex::new(instant))
    }

    /// Move the clock forward by `secs` seconds.
    pub fn advance(&self, secs: i64) {
        let mut now = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now += chrono::Duration::seconds(secs);
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Token service signing with [`TEST_SECRET`] and reading `clock`.
pub fn token_service(clock: Arc<dyn Clock>) -> TokenService {
    let secret = match TokenSecret::new(TEST_SECRET.to_vec()) {
        Ok(secret) => secret,
        Err(err) => panic!("test secret must be valid: {err}"),
    };
    TokenService::new(&secret, clock)
}

/// Seconds since the epoch at which [`MemoryHarness`] clocks start.
pub const HARNESS_EPOCH: i64 = 1_700_000_000;

/// Handler state wired to in-memory adapters, with handles on each part.
pub struct MemoryHarness {
    pub clock: Arc<FixtureClock>,
    pub tokens: Arc<TokenService>,
    pub credentials: Arc<InMemoryCredentialRepository>,
    pub blobs: Arc<InMemoryBlobStore>,
    pub state: HttpState,
}

impl MemoryHarness {
    pub fn new() -> Self {
        let clock = Arc::new(FixtureClock::at(HARNESS_EPOCH));
        let tokens = Arc::new(token_service(clock.clone()));
        let credentials = Arc::new(InMemoryCredentialRepository::new());
        let blobs = Arc::new(InMemoryBlobStore::new());
        let state = HttpState::new(
            Arc::new(CredentialAuthenticator::new(credentials.clone(), tokens.clone())),
            Arc::new(AccessGate::new(tokens.clone(), blobs.clone())),
        );
        Self {
            clock,
            tokens,
            credentials,
            blobs,
            state,
        }
    }

    /// Token for `claims`, signed with the harness secret.
    pub fn token_with(&self, claims: &Claims) -> String {
        match self.tokens.issue(claims) {
            Ok(token) => token,
            Err(err) => panic!("test token must sign: {err}"),
        }
    }

    /// Token asserting only `email`.
    pub fn token_for(&self, email: &str) -> String {
        self.token_with(&Claims::for_email(email))
    }
}

impl Default for MemoryHarness {
    fn default() -> Self {
        Self::new()
    }
}
