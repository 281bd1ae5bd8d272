//! End-to-end request flows against the full route table with in-memory
//! adapters.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test, web};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use warden::Trace;
use warden::domain::{AccessGate, CredentialAuthenticator};
use warden::inbound::http::state::HttpState;
use warden::outbound::blob::CapStdBlobStore;
use warden::test_support::MemoryHarness;

#[fixture]
fn harness() -> MemoryHarness {
    MemoryHarness::new()
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .wrap(Trace)
                .configure(warden::inbound::http::configure),
        )
        .await
    };
}

async fn post_json<S>(app: &S, uri: &str, body: Value) -> (StatusCode, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let request = test::TestRequest::post().uri(uri).set_json(body).to_request();
    let response = test::call_service(app, request).await;
    let status = response.status();
    (status, test::read_body_json(response).await)
}

fn token_of(body: &Value) -> String {
    body.get("token")
        .and_then(Value::as_str)
        .expect("token in body")
        .to_owned()
}

#[rstest]
#[actix_web::test]
async fn register_login_then_use_the_token(harness: MemoryHarness) {
    let app = app!(harness.state.clone());
    let credentials = json!({"email": "new@user.com", "password": "123123"});

    let (status, body) = post_json(&app, "/register", credentials.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        harness.tokens.verify(&token_of(&body)).expect("valid").email,
        "new@user.com"
    );

    let (status, body) = post_json(&app, "/login", credentials).await;
    assert_eq!(status, StatusCode::OK);
    let token = token_of(&body);
    assert_eq!(harness.credentials.login_count("new@user.com"), Some(1));

    let request = test::TestRequest::get()
        .uri("/profile")
        .insert_header((AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let profile: Value = test::read_body_json(response).await;
    assert_eq!(profile.get("email"), Some(&json!("new@user.com")));
}

#[rstest]
#[actix_web::test]
async fn second_registration_reports_the_existing_email(harness: MemoryHarness) {
    let app = app!(harness.state.clone());
    let (status, _) = post_json(
        &app,
        "/register",
        json!({"email": "exist@user.com", "password": "123123"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json(
        &app,
        "/register",
        json!({"email": "exist@user.com", "password": ""}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "email": ["already exists, do you want to reset password?"],
            "password": ["cannot be empty"]
        })
    );
}

#[rstest]
#[actix_web::test]
async fn wrong_password_is_indistinguishable_from_unknown_email(harness: MemoryHarness) {
    let app = app!(harness.state.clone());
    post_json(
        &app,
        "/register",
        json!({"email": "known@user.com", "password": "123123"}),
    )
    .await;

    let (wrong_status, wrong_body) = post_json(
        &app,
        "/login",
        json!({"email": "known@user.com", "password": "nope"}),
    )
    .await;
    let (unknown_status, unknown_body) = post_json(
        &app,
        "/login",
        json!({"email": "unknown@user.com", "password": "nope"}),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_status, unknown_status);
    assert_eq!(wrong_body, json!({"__error__": ["email or password do not match"]}));
    assert_eq!(wrong_body, unknown_body);
}

#[rstest]
#[actix_web::test]
async fn expired_tokens_are_forbidden(harness: MemoryHarness) {
    let tokens = Arc::new(
        warden::test_support::token_service(harness.clock.clone())
            .with_ttl(Some(std::time::Duration::from_secs(60))),
    );
    let state = HttpState::new(
        Arc::new(CredentialAuthenticator::new(
            harness.credentials.clone(),
            tokens.clone(),
        )),
        Arc::new(AccessGate::new(tokens, harness.blobs.clone())),
    );
    let app = app!(state);
    let (_, body) = post_json(
        &app,
        "/register",
        json!({"email": "brief@user.com", "password": "123123"}),
    )
    .await;
    let token = token_of(&body);

    harness.clock.advance(61);
    let request = test::TestRequest::get()
        .uri("/profile")
        .insert_header((AUTHORIZATION, token))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn blob_round_trip_on_disk(harness: MemoryHarness) {
    let root = tempfile::tempdir().expect("temp dir");
    let store = CapStdBlobStore::open(root.path()).expect("open store");
    let state = HttpState::new(
        harness.state.authenticator.clone(),
        Arc::new(AccessGate::new(harness.tokens.clone(), Arc::new(store))),
    );
    let app = app!(state);
    let auth = (AUTHORIZATION, format!("Bearer {}", harness.token_for("a@b.io")));

    let upload = test::TestRequest::put()
        .uri("/files/doc.pdf")
        .insert_header(auth.clone())
        .set_payload(b"%PDF-1.7 body".to_vec())
        .to_request();
    assert_eq!(
        test::call_service(&app, upload).await.status(),
        StatusCode::CREATED
    );
    assert!(root.path().join("doc.pdf").exists());

    let download = test::TestRequest::get()
        .uri("/files/doc.pdf")
        .insert_header(auth.clone())
        .to_request();
    let response = test::call_service(&app, download).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok()),
        Some("application/pdf")
    );

    let remove = test::TestRequest::delete()
        .uri("/files/doc.pdf")
        .insert_header(auth)
        .to_request();
    assert_eq!(
        test::call_service(&app, remove).await.status(),
        StatusCode::NO_CONTENT
    );
    assert!(!root.path().join("doc.pdf").exists());
}

#[rstest]
#[actix_web::test]
async fn absent_authorization_is_denied_before_any_lookup(harness: MemoryHarness) {
    let app = app!(harness.state.clone());
    let request = test::TestRequest::get().uri("/files/secret.txt").to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.headers().contains_key("trace-id"));
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body, json!({"__error__": ["forbidden"]}));
}
