//! Credential data model.
//!
//! A credential is either unpersisted ([`Credential`], what registration asks
//! storage to create) or persisted ([`StoredCredential`], what storage hands
//! back). The password only ever travels towards storage; persisted records
//! never carry it.

use std::fmt;

use zeroize::Zeroizing;

/// Error returned when a storage identifier is not positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCredentialId(pub i32);

impl fmt::Display for InvalidCredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "credential id must be positive, got {}", self.0)
    }
}

impl std::error::Error for InvalidCredentialId {}

/// Identifier assigned by storage on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CredentialId(i32);

impl CredentialId {
    /// Validate a storage-assigned identifier; zero means "not persisted".
    pub fn new(id: i32) -> Result<Self, InvalidCredentialId> {
        if id > 0 {
            Ok(Self(id))
        } else {
            Err(InvalidCredentialId(id))
        }
    }

    /// Raw identifier value.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unpersisted credential.
///
/// ## Invariants
/// - `email` is trimmed.
/// - `password` is kept verbatim and zeroed on drop.
///
/// # Examples
/// ```
/// use warden::domain::Credential;
///
/// let credential = Credential::new(" ada@example.com ", "hunter22");
/// assert_eq!(credential.email(), "ada@example.com");
/// assert!(!format!("{credential:?}").contains("hunter22"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    email: String,
    password: Zeroizing<String>,
}

impl Credential {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_owned(),
            password: Zeroizing::new(password.to_owned()),
        }
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Persisted credential as returned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    pub id: CredentialId,
    pub email: String,
}
