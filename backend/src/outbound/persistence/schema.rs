//! Diesel table definitions. Must match `backend/migrations` exactly.

diesel::table! {
    /// Registered credentials.
    users (id) {
        id -> Int4,
        /// Unique login identity.
        email -> Varchar,
        /// Hex SHA-256 of the email-salted password.
        password_digest -> Varchar,
        created_at -> Timestamptz,
        last_login -> Nullable<Timestamptz>,
    }
}
