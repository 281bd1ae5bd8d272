//! Composable field validation.
//!
//! A [`ValidationSchema`] binds an ordered list of [`FieldRule`]s to each
//! named field. [`validate`] runs every field in declaration order, stops at
//! the first failing rule of a field, and collects the failures into a
//! [`ValidationReport`]. Rules are closed-world variants evaluated by a single
//! function, so adding a rule kind means adding a match arm.

mod report;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};

pub use report::{FieldError, FieldErrorCode, REQUEST_FIELD, ValidationReport};

type Predicate = dyn Fn(&str) -> Result<(), FieldError> + Send + Sync;

/// Caller-supplied check, for anything the built-in rules cannot express.
#[derive(Clone)]
pub struct CustomRule {
    name: &'static str,
    check: Arc<Predicate>,
}

impl CustomRule {
    /// Wrap `check` under a descriptive `name` (used in `Debug` output).
    pub fn new<F>(name: &'static str, check: F) -> Self
    where
        F: Fn(&str) -> Result<(), FieldError> + Send + Sync + 'static,
    {
        Self {
            name,
            check: Arc::new(check),
        }
    }
}

impl fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A single pure check bound to one field.
#[derive(Debug, Clone)]
pub enum FieldRule {
    /// Value must contain something other than whitespace.
    NonEmpty { message: String },
    /// Value length in characters must lie in `min..=max`.
    Length {
        min: usize,
        max: usize,
        message: String,
    },
    /// Value must match `source`. A pattern that fails to compile is
    /// reported against the field instead of aborting validation.
    Pattern {
        source: String,
        compiled: Result<Regex, regex::Error>,
        message: String,
    },
    /// Caller-supplied predicate.
    Custom(CustomRule),
}

impl FieldRule {
    /// Non-empty rule with the default message.
    pub fn non_empty() -> Self {
        Self::NonEmpty {
            message: "cannot be empty".to_owned(),
        }
    }

    /// Inclusive length rule with the default message.
    pub fn length(min: usize, max: usize) -> Self {
        Self::Length {
            min,
            max,
            message: format!("length is not between {min} and {max}"),
        }
    }

    /// Pattern rule; the expression is compiled once, here.
    pub fn pattern(source: &str, message: impl Into<String>) -> Self {
        Self::Pattern {
            source: source.to_owned(),
            compiled: Regex::new(source),
            message: message.into(),
        }
    }

    /// Custom predicate rule.
    pub fn custom<F>(name: &'static str, check: F) -> Self
    where
        F: Fn(&str) -> Result<(), FieldError> + Send + Sync + 'static,
    {
        Self::Custom(CustomRule::new(name, check))
    }

    /// Replace the message reported when this rule fails.
    ///
    /// Custom rules produce their own errors and are returned unchanged.
    #[must_use]
    pub fn with_message(mut self, text: impl Into<String>) -> Self {
        match &mut self {
            Self::NonEmpty { message }
            | Self::Length { message, .. }
            | Self::Pattern { message, .. } => *message = text.into(),
            Self::Custom(_) => {}
        }
        self
    }

    fn evaluate(&self, value: &str) -> Result<(), FieldError> {
        match self {
            Self::NonEmpty { message } => {
                if value.trim().is_empty() {
                    Err(FieldError::invalid(message.as_str()))
                } else {
                    Ok(())
                }
            }
            Self::Length { min, max, message } => {
                let len = value.chars().count();
                if (*min..=*max).contains(&len) {
                    Ok(())
                } else {
                    Err(FieldError::invalid(message.as_str()))
                }
            }
            Self::Pattern {
                compiled, message, ..
            } => match compiled {
                Ok(regex) if regex.is_match(value) => Ok(()),
                Ok(_) => Err(FieldError::invalid(message.as_str())),
                Err(err) => Err(FieldError::unrecognized(format!(
                    "cannot evaluate pattern: {err}"
                ))),
            },
            Self::Custom(rule) => (rule.check)(value),
        }
    }
}

/// How a field is presented to clients in rule descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Password,
}

impl InputKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Password => "password",
        }
    }
}

#[derive(Debug, Clone)]
struct FieldSpec {
    name: &'static str,
    kind: InputKind,
    rules: Vec<FieldRule>,
}

/// Ordered mapping from field name to its rules.
///
/// # Examples
/// ```
/// use warden::domain::validation::{FieldRule, FieldValues, InputKind, ValidationSchema, validate};
///
/// let schema = ValidationSchema::new()
///     .field("email", InputKind::Text, vec![FieldRule::non_empty()])
///     .field("password", InputKind::Password, vec![FieldRule::non_empty()]);
/// let input = FieldValues::new().with("email", "a@b.io");
/// let report = validate(&schema, &input);
/// assert_eq!(report.messages("password"), vec!["cannot be empty"]);
/// assert!(!report.has_field("email"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidationSchema {
    fields: Vec<FieldSpec>,
}

impl ValidationSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` with its rules. Declaration order is report order.
    #[must_use]
    pub fn field(mut self, name: &'static str, kind: InputKind, rules: Vec<FieldRule>) -> Self {
        self.fields.push(FieldSpec { name, kind, rules });
        self
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|spec| spec.name)
    }

    /// Client-facing description of the schema, derived from its rules.
    pub fn descriptors(&self) -> SchemaDescriptors<'_> {
        SchemaDescriptors { schema: self }
    }
}

/// Input values keyed by field name. Absent fields read as empty strings.
#[derive(Debug, Clone, Default)]
pub struct FieldValues<'a> {
    values: HashMap<&'a str, &'a str>,
}

impl<'a> FieldValues<'a> {
    /// Create an empty input set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` to `field`.
    #[must_use]
    pub fn with(mut self, field: &'a str, value: &'a str) -> Self {
        self.values.insert(field, value);
        self
    }

    fn get(&self, field: &str) -> &'a str {
        self.values.get(field).copied().unwrap_or_default()
    }
}

/// Evaluate `input` against `schema`.
///
/// Every field is visited; within a field, evaluation stops at the first
/// failing rule. The returned report is empty iff every rule passed.
pub fn validate(schema: &ValidationSchema, input: &FieldValues<'_>) -> ValidationReport {
    let mut report = ValidationReport::with_fields(schema.field_names());
    for spec in &schema.fields {
        let value = input.get(spec.name);
        if let Some(error) = spec.rules.iter().find_map(|rule| rule.evaluate(value).err()) {
            report.push(spec.name, error);
        }
    }
    report
}

/// Serialises a schema as `{"field": {"type": .., "required": "1", ..}}`.
///
/// All values are strings, matching what browser form helpers expect.
pub struct SchemaDescriptors<'a> {
    schema: &'a ValidationSchema,
}

impl Serialize for SchemaDescriptors<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.schema.fields.len()))?;
        for spec in &self.schema.fields {
            map.serialize_entry(spec.name, &FieldDescriptor::from(spec))?;
        }
        map.end()
    }
}

struct FieldDescriptor<'a> {
    kind: InputKind,
    required: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<&'a str>,
}

impl<'a> From<&'a FieldSpec> for FieldDescriptor<'a> {
    fn from(spec: &'a FieldSpec) -> Self {
        let mut descriptor = Self {
            kind: spec.kind,
            required: false,
            min_length: None,
            max_length: None,
            pattern: None,
        };
        for rule in &spec.rules {
            match rule {
                FieldRule::NonEmpty { .. } => descriptor.required = true,
                FieldRule::Length { min, max, .. } => {
                    descriptor.min_length = Some(*min);
                    descriptor.max_length = Some(*max);
                }
                FieldRule::Pattern { source, .. } => descriptor.pattern = Some(source),
                FieldRule::Custom(_) => {}
            }
        }
        descriptor
    }
}

impl Serialize for FieldDescriptor<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.kind.as_str())?;
        if self.required {
            map.serialize_entry("required", "1")?;
        }
        if let Some(min) = self.min_length {
            map.serialize_entry("minLength", &min.to_string())?;
        }
        if let Some(max) = self.max_length {
            map.serialize_entry("maxLength", &max.to_string())?;
        }
        if let Some(pattern) = self.pattern {
            map.serialize_entry("pattern", pattern)?;
        }
        map.end()
    }
}
