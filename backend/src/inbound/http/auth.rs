//! Bearer token extraction.
//!
//! Handlers receive the raw `Authorization` value and pass it to the domain
//! untouched apart from the optional `Bearer ` prefix; deciding whether the
//! token is acceptable is the access gate's job, so a missing header is not
//! an extractor failure.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

const BEARER_SCHEME: &str = "bearer";

/// Token presented by the caller, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BearerToken(Option<String>);

impl BearerToken {
    /// Parse an `Authorization` header value.
    ///
    /// # Examples
    /// ```
    /// use warden::inbound::http::auth::BearerToken;
    ///
    /// assert_eq!(BearerToken::from_header("Bearer abc").as_deref(), Some("abc"));
    /// assert_eq!(BearerToken::from_header("abc").as_deref(), Some("abc"));
    /// assert_eq!(BearerToken::from_header("  ").as_deref(), None);
    /// ```
    pub fn from_header(value: &str) -> Self {
        let value = value.trim();
        let token = match value.split_once(char::is_whitespace) {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case(BEARER_SCHEME) => rest.trim_start(),
            None if value.eq_ignore_ascii_case(BEARER_SCHEME) => "",
            _ => value,
        };
        if token.is_empty() {
            Self(None)
        } else {
            Self(Some(token.to_owned()))
        }
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl FromRequest for BearerToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(BearerToken::from_header)
            .unwrap_or_default();
        ready(Ok(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    #[rstest]
    #[case("Bearer abc.def.ghi", Some("abc.def.ghi"))]
    #[case("bearer abc", Some("abc"))]
    #[case("BEARER   abc", Some("abc"))]
    #[case("abc", Some("abc"))]
    #[case("Bearer ", None)]
    #[case("", None)]
    #[case("Bearerabc", Some("Bearerabc"))]
    fn strips_optional_prefix(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(BearerToken::from_header(header).as_deref(), expected);
    }

    #[actix_web::test]
    async fn missing_header_yields_no_token() {
        let req = TestRequest::default().to_http_request();
        let token = BearerToken::extract(&req).await.expect("infallible");
        assert_eq!(token, BearerToken::default());
    }

    #[actix_web::test]
    async fn header_value_is_extracted() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer t0k"))
            .to_http_request();
        let token = BearerToken::extract(&req).await.expect("infallible");
        assert_eq!(token.as_deref(), Some("t0k"));
    }
}
