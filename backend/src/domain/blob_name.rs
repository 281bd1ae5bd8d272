//! Sanitised names for blob store entries.
//!
//! A [`BlobName`] can only be obtained through [`BlobName::parse`], so every
//! value reaching the blob store has passed the full set of checks below.

use std::fmt;

/// Longest accepted name, in bytes.
pub const MAX_BLOB_NAME_LEN: usize = 255;

/// Reasons a requested name was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobNameError {
    Empty,
    TooLong { len: usize },
    Traversal,
    ForbiddenCharacter { ch: char },
}

impl fmt::Display for BlobNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "blob name must not be empty"),
            Self::TooLong { len } => write!(
                f,
                "blob name is {len} bytes, longer than {MAX_BLOB_NAME_LEN}"
            ),
            Self::Traversal => write!(f, "blob name contains a directory traversal"),
            Self::ForbiddenCharacter { ch } => {
                write!(f, "blob name contains forbidden character {ch:?}")
            }
        }
    }
}

impl std::error::Error for BlobNameError {}

/// Name of a blob, safe to hand to any store.
///
/// ## Invariants
/// - Non-empty and at most [`MAX_BLOB_NAME_LEN`] bytes.
/// - Not `.` or `..` and free of `../` or `..\` sequences.
/// - Free of control characters, quotes, backticks and path separators.
///
/// # Examples
/// ```
/// use warden::domain::BlobName;
///
/// assert!(BlobName::parse("report.pdf").is_ok());
/// assert!(BlobName::parse("../etc/passwd").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobName(String);

impl BlobName {
    pub fn parse(raw: &str) -> Result<Self, BlobNameError> {
        if raw.is_empty() {
            return Err(BlobNameError::Empty);
        }
        if raw.len() > MAX_BLOB_NAME_LEN {
            return Err(BlobNameError::TooLong { len: raw.len() });
        }
        if raw == "." || raw == ".." || raw.contains("../") || raw.contains("..\\") {
            return Err(BlobNameError::Traversal);
        }
        if let Some(ch) = raw.chars().find(|ch| is_forbidden(*ch)) {
            return Err(BlobNameError::ForbiddenCharacter { ch });
        }
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn is_forbidden(ch: char) -> bool {
    ch.is_control() || matches!(ch, '`' | '"' | '\'' | '/' | '\\')
}

impl AsRef<str> for BlobName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for BlobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
