//! Domain primitives and use-cases.
//!
//! Purpose: hold the pure components (validation engine, token service,
//! blob naming, content sniffing) and the two orchestrating services that
//! sit on top of the storage and blob store ports. Nothing in here knows
//! about HTTP; inbound adapters translate [`Error`] into their protocol.
//!
//! Public surface:
//! - [`CredentialAuthenticator`]: registration and login.
//! - [`AccessGate`]: token- and name-checked blob operations.
//! - [`TokenService`]: signed bearer tokens with a pinned algorithm.
//! - [`validation`]: composable field rules and aggregated reports.

pub mod access_gate;
pub mod authenticator;
pub mod blob_name;
pub mod content_type;
pub mod credential;
pub mod error;
pub mod ports;
pub mod token;
pub mod trace_id;
pub mod validation;

pub use self::access_gate::{AccessGate, FetchedBlob};
pub use self::authenticator::CredentialAuthenticator;
pub use self::blob_name::{BlobName, BlobNameError, MAX_BLOB_NAME_LEN};
pub use self::credential::{Credential, CredentialId, InvalidCredentialId, StoredCredential};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::token::{Claims, TokenError, TokenSecret, TokenSecretError, TokenService};
pub use self::trace_id::TraceId;
pub use self::validation::{ValidationReport, ValidationSchema};
