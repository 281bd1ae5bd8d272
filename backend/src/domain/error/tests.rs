//! Tests for domain error construction and trace propagation.

use super::*;
use rstest::rstest;
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[rstest]
#[case(Error::forbidden(), ErrorCode::Forbidden, "forbidden")]
#[case(Error::unavailable(), ErrorCode::ServiceUnavailable, "unavailable")]
#[case(Error::not_found("file not found"), ErrorCode::NotFound, "file not found")]
#[case(Error::internal("try later"), ErrorCode::InternalError, "try later")]
fn constructors_set_code_and_request_message(
    #[case] error: Error,
    #[case] code: ErrorCode,
    #[case] message: &str,
) {
    assert_eq!(error.code(), code);
    assert_eq!(
        serde_json::to_value(error.report()).expect("serialise"),
        json!({ "__error__": [message] })
    );
}

#[rstest]
fn invalid_request_keeps_field_errors() {
    let mut report = ValidationReport::new();
    report.push("email", crate::domain::validation::FieldError::invalid("cannot be empty"));
    let error = Error::invalid_request(report.clone());
    assert_eq!(error.report(), &report);
    assert_eq!(error.to_string(), "invalid_request: email: cannot be empty");
}

#[rstest]
fn trace_id_is_absent_out_of_scope() {
    assert!(Error::forbidden().trace_id().is_none());
}

#[tokio::test]
async fn trace_id_is_captured_in_scope() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid uuid");
    let error = TraceId::scope(trace_id, async { Error::forbidden() }).await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn with_trace_id_overrides_captured_value() {
    let error = Error::unavailable().with_trace_id("abc");
    assert_eq!(error.trace_id(), Some("abc"));
}

#[rstest]
fn error_codes_serialise_as_snake_case() {
    let value = serde_json::to_value(ErrorCode::ServiceUnavailable).expect("serialise");
    assert_eq!(value, json!("service_unavailable"));
    assert_eq!(ErrorCode::ServiceUnavailable.as_str(), "service_unavailable");
}
