//! Registration and login use-cases.
//!
//! Both flows validate input with a [`ValidationSchema`] first and only then
//! consult storage, so an external lookup never runs for a field that already
//! failed a local check. A successful flow ends with a freshly minted token.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::ports::{CredentialRepository, CredentialRepositoryError};
use crate::domain::token::{Claims, TokenService};
use crate::domain::validation::{
    FieldError, FieldRule, FieldValues, InputKind, ValidationReport, ValidationSchema, validate,
};
use crate::domain::{Credential, Error};

/// Email shape accepted at registration.
pub const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$";

const EMAIL_FIELD: &str = "email";
const PASSWORD_FIELD: &str = "password";

const EMAIL_EXISTS: &str = "already exists, do you want to reset password?";
const EMAIL_UNVERIFIED: &str = "cannot verify email address, please try again in a few minutes";
const CREATE_FAILED: &str = "cannot create user, please try again in a few minutes";
const LOGIN_MISMATCH: &str = "email or password do not match";
const LOGIN_UNAVAILABLE: &str = "cannot sign in, please try again in a few minutes";
const TOKEN_FAILED: &str = "cannot issue token, please try again in a few minutes";

fn register_schema() -> ValidationSchema {
    ValidationSchema::new()
        .field(
            EMAIL_FIELD,
            InputKind::Text,
            vec![
                FieldRule::non_empty(),
                FieldRule::length(4, 120),
                FieldRule::pattern(EMAIL_PATTERN, "wrong email format"),
            ],
        )
        .field(
            PASSWORD_FIELD,
            InputKind::Password,
            vec![FieldRule::non_empty(), FieldRule::length(4, 120)],
        )
}

fn login_schema() -> ValidationSchema {
    ValidationSchema::new()
        .field(EMAIL_FIELD, InputKind::Text, vec![FieldRule::non_empty()])
        .field(
            PASSWORD_FIELD,
            InputKind::Password,
            vec![FieldRule::non_empty()],
        )
}

fn values(credential: &Credential) -> FieldValues<'_> {
    FieldValues::new()
        .with(EMAIL_FIELD, credential.email())
        .with(PASSWORD_FIELD, credential.password())
}

/// Orchestrates registration and login against a credential repository.
#[derive(Clone)]
pub struct CredentialAuthenticator {
    repository: Arc<dyn CredentialRepository>,
    tokens: Arc<TokenService>,
    register_schema: ValidationSchema,
    login_schema: ValidationSchema,
}

impl CredentialAuthenticator {
    pub fn new(repository: Arc<dyn CredentialRepository>, tokens: Arc<TokenService>) -> Self {
        Self {
            repository,
            tokens,
            register_schema: register_schema(),
            login_schema: login_schema(),
        }
    }

    /// Rules applied to registration input.
    pub fn register_schema(&self) -> &ValidationSchema {
        &self.register_schema
    }

    /// Rules applied to login input.
    pub fn login_schema(&self) -> &ValidationSchema {
        &self.login_schema
    }

    /// Create a credential and return a token for it.
    ///
    /// # Errors
    /// - [`crate::domain::ErrorCode::InvalidRequest`] with the aggregated
    ///   report when validation or the existence check fails.
    /// - [`crate::domain::ErrorCode::InternalError`] when storage cannot
    ///   persist the credential or the token cannot be signed.
    pub async fn register(&self, credential: &Credential) -> Result<String, Error> {
        let mut report = validate(&self.register_schema, &values(credential));
        if !report.has_field(EMAIL_FIELD) {
            self.check_email_free(credential.email(), &mut report).await;
        }
        if !report.is_empty() {
            debug!(fields = ?report.fields().collect::<Vec<_>>(), "registration rejected");
            return Err(Error::invalid_request(report));
        }

        let id = match self.repository.create(credential).await {
            Ok(id) => id,
            Err(CredentialRepositoryError::Conflict { .. }) => {
                let mut report = ValidationReport::new();
                report.push(EMAIL_FIELD, FieldError::invalid(EMAIL_EXISTS));
                return Err(Error::invalid_request(report));
            }
            Err(err) => {
                error!(error = %err, "failed to create credential");
                return Err(Error::internal(CREATE_FAILED));
            }
        };
        info!(credential_id = %id, "credential registered");
        self.mint(credential.email())
    }

    /// Check a credential and return a token for it.
    ///
    /// Unknown emails and wrong passwords are reported with one
    /// indistinguishable message.
    ///
    /// # Errors
    /// - [`crate::domain::ErrorCode::InvalidRequest`] when validation fails
    ///   or no credential matches.
    /// - [`crate::domain::ErrorCode::InternalError`] when the lookup fails or
    ///   the token cannot be signed.
    pub async fn login(&self, credential: &Credential) -> Result<String, Error> {
        let report = validate(&self.login_schema, &values(credential));
        if !report.is_empty() {
            return Err(Error::invalid_request(report));
        }

        let stored = match self
            .repository
            .find_by_email_and_password(credential.email(), credential.password())
            .await
        {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                debug!("login rejected");
                return Err(Error::invalid_request(ValidationReport::request_error(
                    LOGIN_MISMATCH,
                )));
            }
            Err(err) => {
                error!(error = %err, "credential lookup failed during login");
                return Err(Error::internal(LOGIN_UNAVAILABLE));
            }
        };

        if let Err(err) = self.repository.record_login(stored.id).await {
            warn!(error = %err, credential_id = %stored.id, "failed to record login");
        }
        info!(credential_id = %stored.id, "login succeeded");
        self.mint(&stored.email)
    }

    async fn check_email_free(&self, email: &str, report: &mut ValidationReport) {
        match self.repository.find_by_email(email).await {
            Ok(None) => {}
            Ok(Some(_)) => report.push(EMAIL_FIELD, FieldError::invalid(EMAIL_EXISTS)),
            Err(err) => {
                error!(error = %err, "credential lookup failed during registration");
                report.push(EMAIL_FIELD, FieldError::unrecognized(EMAIL_UNVERIFIED));
            }
        }
    }

    fn mint(&self, email: &str) -> Result<String, Error> {
        self.tokens.mint(Claims::for_email(email)).map_err(|err| {
            error!(error = %err, "failed to sign token");
            Error::internal(TOKEN_FAILED)
        })
    }
}
