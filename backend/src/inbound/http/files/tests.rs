//! Handler tests for token-guarded blob access.

use super::*;
use crate::test_support::MemoryHarness;
use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, CONTENT_DISPOSITION};
use actix_web::{App, test as actix_test};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn harness() -> MemoryHarness {
    MemoryHarness::new()
}

macro_rules! app {
    ($harness:expr) => {
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new($harness.state.clone()))
                .configure(crate::inbound::http::configure),
        )
        .await
    };
}

fn bearer(harness: &MemoryHarness) -> (actix_web::http::header::HeaderName, String) {
    (
        AUTHORIZATION,
        format!("Bearer {}", harness.token_for("owner@user.com")),
    )
}

fn header_str<'a>(response: &'a actix_web::dev::ServiceResponse, name: &str) -> Option<&'a str> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
}

#[rstest]
#[actix_web::test]
async fn upload_then_download_sniffs_content(harness: MemoryHarness) {
    let app = app!(harness);
    let upload = actix_test::TestRequest::put()
        .uri("/files/image.dat")
        .insert_header(bearer(&harness))
        .set_payload(b"\x89PNG\r\n\x1a\n rest of image".to_vec())
        .to_request();
    let response = actix_test::call_service(&app, upload).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(header_str(&response, "location"), Some("/content/image.dat"));

    let download = actix_test::TestRequest::get()
        .uri("/files/image.dat")
        .insert_header(bearer(&harness))
        .to_request();
    let response = actix_test::call_service(&app, download).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, "content-type"), Some("image/png"));
    let disposition = response
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .expect("content disposition");
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("filename=\"image.dat\""));
    let body = actix_test::read_body(response).await;
    assert_eq!(&body[..], b"\x89PNG\r\n\x1a\n rest of image");
}

#[rstest]
#[actix_web::test]
async fn delete_removes_and_then_reports_missing(harness: MemoryHarness) {
    let app = app!(harness);
    let upload = actix_test::TestRequest::put()
        .uri("/files/notes.txt")
        .insert_header(bearer(&harness))
        .set_payload("hello")
        .to_request();
    assert_eq!(
        actix_test::call_service(&app, upload).await.status(),
        StatusCode::CREATED
    );

    let remove = || {
        actix_test::TestRequest::delete()
            .uri("/files/notes.txt")
            .insert_header(bearer(&harness))
            .to_request()
    };
    let response = actix_test::call_service(&app, remove()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(harness.blobs.names().is_empty());

    let response = actix_test::call_service(&app, remove()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!({"__error__": ["file not found"]}));
}

#[rstest]
#[case(None)]
#[case(Some("".to_owned()))]
#[case(Some("Bearer forged".to_owned()))]
#[actix_web::test]
async fn fetch_without_valid_token_is_forbidden(
    harness: MemoryHarness,
    #[case] header: Option<String>,
) {
    let app = app!(harness);
    let mut request = actix_test::TestRequest::get().uri("/files/anything");
    if let Some(value) = header {
        request = request.insert_header((AUTHORIZATION, value));
    }

    let response = actix_test::call_service(&app, request.to_request()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!({"__error__": ["forbidden"]}));
}

#[rstest]
#[case("..%5Cwindows")]
#[case("%2E%2E")]
#[case("%60whoami%60")]
#[case("line%0Abreak")]
#[actix_web::test]
async fn unsafe_names_never_reach_the_store(harness: MemoryHarness, #[case] encoded: &str) {
    let app = app!(harness);
    let request = actix_test::TestRequest::put()
        .uri(&format!("/files/{encoded}"))
        .insert_header(bearer(&harness))
        .set_payload("payload")
        .to_request();

    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!({"__error__": ["unavailable"]}));
    assert!(harness.blobs.names().is_empty());
}
