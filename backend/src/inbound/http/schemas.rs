//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay free of utoipa derives; these wrappers mirror their wire
//! shape for the generated document.

use std::collections::BTreeMap;

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ValidationReport`].
///
/// Field name to ordered messages. Whole-request failures use `__error__`.
#[derive(ToSchema)]
#[schema(
    as = crate::domain::ValidationReport,
    example = json!({"email": ["wrong email format"], "password": ["cannot be empty"]})
)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ValidationReportSchema(BTreeMap<String, Vec<String>>);

/// OpenAPI schema for one entry of a field-rule descriptor map.
#[derive(ToSchema)]
#[schema(as = crate::domain::validation::FieldDescriptor)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct FieldDescriptorSchema {
    /// Input kind, `string` or `password`.
    #[schema(rename = "type", example = "string")]
    kind: String,
    /// `"1"` when the field must not be empty.
    required: Option<String>,
    /// Minimum length in characters, as a decimal string.
    #[schema(rename = "minLength", example = "4")]
    min_length: Option<String>,
    /// Maximum length in characters, as a decimal string.
    #[schema(rename = "maxLength", example = "120")]
    max_length: Option<String>,
    /// Regular expression the value must match.
    pattern: Option<String>,
}

/// OpenAPI schema for a field-rule descriptor map keyed by field name.
#[derive(ToSchema)]
#[schema(as = crate::domain::validation::SchemaDescriptors)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SchemaDescriptorsSchema(BTreeMap<String, FieldDescriptorSchema>);
