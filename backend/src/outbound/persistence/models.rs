//! Internal Diesel row structs. Never exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::users;

/// Columns read back when a credential is found.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialRow {
    pub id: i32,
    pub email: String,
}

/// Insertable row for a new credential.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewCredentialRow<'a> {
    pub email: &'a str,
    pub password_digest: &'a str,
}

/// Changeset applied after a successful login.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct LoginUpdate {
    pub last_login: Option<DateTime<Utc>>,
}
