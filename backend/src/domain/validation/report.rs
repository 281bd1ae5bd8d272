//! Aggregated per-field validation report.
//!
//! The report keeps fields in the order they were declared by the schema that
//! produced it, so its JSON form is stable: `{"field": ["message", ...]}`.
//! Fields without errors are omitted from the serialised output.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Reserved pseudo-field carrying whole-request and cross-field errors.
pub const REQUEST_FIELD: &str = "__error__";

/// Machine-readable category attached to every field error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldErrorCode {
    /// The value was checked and failed the rule.
    Invalid,
    /// The rule could not reach a verdict (bad pattern, collaborator fault).
    Unrecognized,
}

impl FieldErrorCode {
    /// Stable snake-case identifier, used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// One failed check for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    code: FieldErrorCode,
    message: String,
}

impl FieldError {
    /// Error for a value that failed a rule.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            code: FieldErrorCode::Invalid,
            message: message.into(),
        }
    }

    /// Error for a check that could not be completed.
    pub fn unrecognized(message: impl Into<String>) -> Self {
        Self {
            code: FieldErrorCode::Unrecognized,
            message: message.into(),
        }
    }

    /// Category of the failure.
    pub fn code(&self) -> FieldErrorCode {
        self.code
    }

    /// Human-readable message surfaced to clients.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ReportEntry {
    field: String,
    errors: Vec<FieldError>,
}

/// Mapping from field name to the ordered messages produced for it.
///
/// ## Invariants
/// - Field order is the order in which fields were first reserved or pushed.
/// - [`ValidationReport::is_empty`] holds iff no field carries an error.
///
/// # Examples
/// ```
/// use warden::domain::validation::{FieldError, ValidationReport};
///
/// let mut report = ValidationReport::new();
/// report.push("email", FieldError::invalid("cannot be empty"));
/// assert_eq!(
///     serde_json::to_string(&report).unwrap(),
///     r#"{"email":["cannot be empty"]}"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    entries: Vec<ReportEntry>,
}

impl ValidationReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty report whose field order is fixed up front.
    pub(crate) fn with_fields<'a>(fields: impl IntoIterator<Item = &'a str>) -> Self {
        let mut report = Self::new();
        for field in fields {
            report.slot(field);
        }
        report
    }

    /// Report holding a single whole-request error.
    pub fn request_error(message: impl Into<String>) -> Self {
        let mut report = Self::new();
        report.push_request_error(message);
        report
    }

    /// Append an error to `field`, keeping the field's existing position.
    pub fn push(&mut self, field: &str, error: FieldError) {
        self.slot(field).errors.push(error);
    }

    /// Append a whole-request error under [`REQUEST_FIELD`].
    pub fn push_request_error(&mut self, message: impl Into<String>) {
        self.push(REQUEST_FIELD, FieldError::invalid(message));
    }

    /// Merge another report into this one.
    pub fn extend(&mut self, other: ValidationReport) {
        for entry in other.entries {
            let slot = self.slot(&entry.field);
            slot.errors.extend(entry.errors);
        }
    }

    /// True when no field carries an error.
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|entry| entry.errors.is_empty())
    }

    /// True when `field` carries at least one error.
    pub fn has_field(&self, field: &str) -> bool {
        !self.errors(field).is_empty()
    }

    /// Errors recorded for `field`, in the order they were pushed.
    pub fn errors(&self, field: &str) -> &[FieldError] {
        self.entries
            .iter()
            .find(|entry| entry.field == field)
            .map_or(&[], |entry| entry.errors.as_slice())
    }

    /// Messages recorded for `field`.
    pub fn messages(&self, field: &str) -> Vec<&str> {
        self.errors(field).iter().map(FieldError::message).collect()
    }

    /// Fields carrying at least one error, in report order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|entry| !entry.errors.is_empty())
            .map(|entry| entry.field.as_str())
    }

    fn slot(&mut self, field: &str) -> &mut ReportEntry {
        let index = match self.entries.iter().position(|entry| entry.field == field) {
            Some(index) => index,
            None => {
                self.entries.push(ReportEntry {
                    field: field.to_owned(),
                    errors: Vec::new(),
                });
                self.entries.len() - 1
            }
        };
        &mut self.entries[index]
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for entry in self.entries.iter().filter(|entry| !entry.errors.is_empty()) {
            for error in &entry.errors {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{}: {}", entry.field, error.message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl Serialize for ValidationReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let populated: Vec<&ReportEntry> = self
            .entries
            .iter()
            .filter(|entry| !entry.errors.is_empty())
            .collect();
        let mut map = serializer.serialize_map(Some(populated.len()))?;
        for entry in populated {
            let messages: Vec<&str> = entry.errors.iter().map(FieldError::message).collect();
            map.serialize_entry(&entry.field, &messages)?;
        }
        map.end()
    }
}
