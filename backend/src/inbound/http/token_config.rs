//! Token signing secret configuration.
//!
//! The secret is read once at startup from a file named by the environment
//! and handed to the token service; nothing else keeps a copy. Release
//! builds insist on a real secret of reasonable length, debug builds fall
//! back to a random per-process secret.

use std::path::PathBuf;

use mockable::Env;
use rand::RngCore;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::{TokenSecret, TokenSecretError};

const SECRET_DEFAULT_PATH: &str = "/var/run/secrets/token_secret";
const SECRET_MIN_LEN: usize = 32;
const EPHEMERAL_LEN: usize = 64;
const SECRET_FILE_ENV: &str = "WARDEN_TOKEN_SECRET_FILE";
const ALLOW_EPHEMERAL_ENV: &str = "WARDEN_ALLOW_EPHEMERAL_SECRET";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";

/// Build mode for secret validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Tolerates a missing secret file by generating one.
    Debug,
    /// Requires a secret file of at least 32 bytes.
    Release,
}

impl BuildMode {
    /// Derive the mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Errors raised while loading the signing secret.
#[derive(thiserror::Error, Debug)]
pub enum TokenConfigError {
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read token secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("token secret at {path} is empty")]
    SecretEmpty { path: PathBuf },
    #[error("token secret at {path} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("{ALLOW_EPHEMERAL_ENV} must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Load the signing secret according to the environment and build mode.
///
/// # Examples
///
/// ```rust
/// use warden::inbound::http::token_config::{BuildMode, token_secret_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "WARDEN_TOKEN_SECRET_FILE" => Some("/nonexistent/secret".to_owned()),
///     _ => None,
/// });
///
/// let secret = token_secret_from_env(&env, BuildMode::Debug).expect("ephemeral secret");
/// assert_eq!(secret.len(), 64);
/// ```
pub fn token_secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSecret, TokenConfigError> {
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let path = PathBuf::from(
        env.string(SECRET_FILE_ENV)
            .unwrap_or_else(|| SECRET_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(bytes) => {
            let bytes = Zeroizing::new(bytes);
            let length = bytes.len();
            if mode == BuildMode::Release && length > 0 && length < SECRET_MIN_LEN {
                return Err(TokenConfigError::SecretTooShort {
                    path,
                    length,
                    min_len: SECRET_MIN_LEN,
                });
            }
            TokenSecret::new(bytes.to_vec()).map_err(|TokenSecretError::Empty| {
                TokenConfigError::SecretEmpty { path }
            })
        }
        Err(source) => {
            if mode.is_debug() || allow_ephemeral {
                warn!(
                    path = %path.display(),
                    error = %source,
                    "using temporary token secret (dev only)"
                );
                Ok(ephemeral_secret())
            } else {
                Err(TokenConfigError::SecretRead { path, source })
            }
        }
    }
}

fn ephemeral_secret() -> TokenSecret {
    let mut bytes = vec![0_u8; EPHEMERAL_LEN];
    rand::thread_rng().fill_bytes(&mut bytes);
    match TokenSecret::new(bytes) {
        Ok(secret) => secret,
        Err(TokenSecretError::Empty) => unreachable!("ephemeral secret has a fixed length"),
    }
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, TokenConfigError> {
    let Some(value) = env.string(ALLOW_EPHEMERAL_ENV) else {
        return Ok(false);
    };
    match parse_bool(&value) {
        Some(true) if mode.is_debug() => Ok(true),
        Some(true) => Err(TokenConfigError::EphemeralNotAllowed),
        Some(false) => Ok(false),
        None if mode.is_debug() => {
            warn!(value = %value, "invalid {ALLOW_EPHEMERAL_ENV}; defaulting to disabled");
            Ok(false)
        }
        None => Err(TokenConfigError::InvalidEnv {
            name: ALLOW_EPHEMERAL_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
