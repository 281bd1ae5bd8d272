//! Registration, login and profile handlers.
//!
//! ```text
//! POST /register {"email":"new@user.com","password":"123123"}
//! POST /login {"email":"new@user.com","password":"123123"}
//! GET /profile  (Authorization: Bearer <token>)
//! ```
//!
//! `OPTIONS` on `/register` and `/login` returns the field-rule descriptors
//! of the schema the authenticator runs, so browser forms validate with the
//! same rules as the server.

use actix_web::{HttpResponse, get, post, route, web};
use serde::{Deserialize, Serialize};

use crate::domain::Credential;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerToken;
use crate::inbound::http::schemas::{SchemaDescriptorsSchema, ValidationReportSchema};
use crate::inbound::http::state::HttpState;

/// Credential body for `POST /register` and `POST /login`.
///
/// Missing fields read as empty strings so they are reported by validation
/// rather than rejected as malformed JSON.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(default)]
pub struct CredentialRequest {
    #[schema(example = "new@user.com")]
    pub email: String,
    #[schema(example = "123123")]
    pub password: String,
}

impl From<&CredentialRequest> for Credential {
    fn from(value: &CredentialRequest) -> Self {
        Self::new(&value.email, &value.password)
    }
}

/// Token issued on successful registration or login.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Profile claims carried by the presented token.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ProfileResponse {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Create a credential and return a token for it.
#[utoipa::path(
    post,
    path = "/register",
    request_body = CredentialRequest,
    responses(
        (status = 201, description = "Registered", body = TokenResponse),
        (status = 400, description = "Validation failed", body = ValidationReportSchema),
        (status = 500, description = "Internal server error", body = ValidationReportSchema)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialRequest>,
) -> ApiResult<HttpResponse> {
    let credential = Credential::from(&*payload);
    let token = state.authenticator.register(&credential).await?;
    Ok(HttpResponse::Created().json(TokenResponse { token }))
}

/// Field-rule descriptors for registration forms.
#[utoipa::path(
    options,
    path = "/register",
    responses((status = 200, description = "Field rules", body = SchemaDescriptorsSchema)),
    tags = ["users"],
    operation_id = "registerRules",
    security([])
)]
#[route("/register", method = "OPTIONS")]
pub async fn register_rules(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok().json(state.authenticator.register_schema().descriptors())
}

/// Check a credential and return a token for it.
#[utoipa::path(
    post,
    path = "/login",
    request_body = CredentialRequest,
    responses(
        (status = 200, description = "Login success", body = TokenResponse),
        (status = 400, description = "Invalid credentials", body = ValidationReportSchema),
        (status = 500, description = "Internal server error", body = ValidationReportSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let credential = Credential::from(&*payload);
    let token = state.authenticator.login(&credential).await?;
    Ok(web::Json(TokenResponse { token }))
}

/// Field-rule descriptors for login forms.
#[utoipa::path(
    options,
    path = "/login",
    responses((status = 200, description = "Field rules", body = SchemaDescriptorsSchema)),
    tags = ["users"],
    operation_id = "loginRules",
    security([])
)]
#[route("/login", method = "OPTIONS")]
pub async fn login_rules(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok().json(state.authenticator.login_schema().descriptors())
}

/// Return the profile claims of the presented token.
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 403, description = "Missing or invalid token", body = ValidationReportSchema)
    ),
    tags = ["users"],
    operation_id = "profile"
)]
#[get("/profile")]
pub async fn profile(
    state: web::Data<HttpState>,
    token: BearerToken,
) -> ApiResult<web::Json<ProfileResponse>> {
    let claims = state.gate.authorize(token.as_deref())?;
    Ok(web::Json(ProfileResponse {
        email: claims.email,
        first_name: claims.first_name.unwrap_or_default(),
        last_name: claims.last_name.unwrap_or_default(),
    }))
}
