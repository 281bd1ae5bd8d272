//! Tests for token and name gating of blob operations.

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{Blob, MockBlobStore};
use crate::test_support::{FixtureClock, token_service};
use rstest::{fixture, rstest};

#[fixture]
fn tokens() -> Arc<TokenService> {
    Arc::new(token_service(Arc::new(FixtureClock::at(1_700_000_000))))
}

#[fixture]
fn token(tokens: Arc<TokenService>) -> String {
    tokens.issue(&Claims::for_email("owner@example.com")).expect("issue")
}

fn untouched_store() -> MockBlobStore {
    let mut store = MockBlobStore::new();
    store.expect_write().never();
    store.expect_read().never();
    store.expect_delete().never();
    store
}

fn gate(tokens: &Arc<TokenService>, store: MockBlobStore) -> AccessGate {
    AccessGate::new(Arc::clone(tokens), Arc::new(store))
}

#[rstest]
#[case(None)]
#[case(Some(""))]
#[case(Some("   "))]
#[case(Some("not.a.token"))]
#[tokio::test]
async fn missing_or_invalid_tokens_are_denied_before_the_store(
    tokens: Arc<TokenService>,
    #[case] presented: Option<&str>,
) {
    let gate = gate(&tokens, untouched_store());

    let fetch = gate.fetch(presented, "report.pdf").await.expect_err("denied");
    let put = gate.put(presented, "report.pdf", b"x").await.expect_err("denied");
    let remove = gate.remove(presented, "report.pdf").await.expect_err("denied");

    for err in [fetch, put, remove] {
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.report().messages("__error__"), vec!["forbidden"]);
    }
}

#[rstest]
#[tokio::test]
async fn tokens_signed_elsewhere_are_denied(tokens: Arc<TokenService>) {
    let secret = crate::domain::token::TokenSecret::new(b"another secret".to_vec()).expect("secret");
    let foreign = TokenService::new(&secret, Arc::new(FixtureClock::at(1_700_000_000)));
    let forged = foreign.issue(&Claims::for_email("owner@example.com")).expect("issue");

    let err = gate(&tokens, untouched_store())
        .fetch(Some(&forged), "report.pdf")
        .await
        .expect_err("denied");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case("../etc/passwd")]
#[case("a\nb")]
#[case("`rm -rf`")]
#[case("")]
#[tokio::test]
async fn unsafe_names_are_unavailable_before_the_store(
    tokens: Arc<TokenService>,
    token: String,
    #[case] name: &str,
) {
    let gate = gate(&tokens, untouched_store());
    let err = gate.fetch(Some(&token), name).await.expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    assert_eq!(err.report().messages("__error__"), vec!["unavailable"]);
    let err = gate.put(Some(&token), name, b"x").await.expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    let err = gate.remove(Some(&token), name).await.expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn overlong_names_are_unavailable(tokens: Arc<TokenService>, token: String) {
    let name = "a".repeat(256);
    let err = gate(&tokens, untouched_store())
        .fetch(Some(&token), &name)
        .await
        .expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn put_writes_sanitised_name(tokens: Arc<TokenService>, token: String) {
    let mut store = MockBlobStore::new();
    store
        .expect_write()
        .withf(|name, content| name.as_str() == "notes.txt" && content == b"hello")
        .times(1)
        .returning(|_, _| Ok(()));

    let name = gate(&tokens, store)
        .put(Some(&token), "notes.txt", b"hello")
        .await
        .expect("written");
    assert_eq!(name.as_str(), "notes.txt");
}

#[rstest]
#[tokio::test]
async fn fetch_sniffs_content_not_extension(tokens: Arc<TokenService>, token: String) {
    let mut store = MockBlobStore::new();
    store
        .expect_read()
        .times(1)
        .returning(|_| Ok(Blob::new(b"%PDF-1.7 body".to_vec())));

    let fetched = gate(&tokens, store)
        .fetch(Some(&token), "picture.png")
        .await
        .expect("fetched");
    assert_eq!(fetched.content_type, "application/pdf");
    assert_eq!(fetched.size, 13);
    assert_eq!(fetched.name.as_str(), "picture.png");
}

#[rstest]
#[case(BlobStoreError::not_found("gone.txt"), ErrorCode::NotFound, "file not found")]
#[case(BlobStoreError::io("disk on fire"), ErrorCode::InternalError, "please try again in a few minutes")]
#[tokio::test]
async fn store_failures_map_to_opaque_errors(
    tokens: Arc<TokenService>,
    token: String,
    #[case] failure: BlobStoreError,
    #[case] code: ErrorCode,
    #[case] message: &str,
) {
    let mut store = MockBlobStore::new();
    store.expect_delete().times(1).return_once(move |_| Err(failure));

    let err = gate(&tokens, store)
        .remove(Some(&token), "gone.txt")
        .await
        .expect_err("fails");
    assert_eq!(err.code(), code);
    assert_eq!(err.report().messages("__error__"), vec![message]);
}
