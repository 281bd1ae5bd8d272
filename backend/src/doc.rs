//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the schema wrappers from
//! `inbound::http::schemas` and the bearer token security scheme. Swagger UI
//! serves it in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::schemas::{
    FieldDescriptorSchema, SchemaDescriptorsSchema, ValidationReportSchema,
};
use crate::inbound::http::users::{CredentialRequest, ProfileResponse, TokenResponse};

/// Security scheme name referenced by guarded operations.
pub const BEARER_SCHEME: &str = "BearerToken";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /register or POST /login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "warden API",
        description = "Credential registration, token issuance and token-guarded blob access."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::register_rules,
        crate::inbound::http::users::login,
        crate::inbound::http::users::login_rules,
        crate::inbound::http::users::profile,
        crate::inbound::http::files::put_file,
        crate::inbound::http::files::get_file,
        crate::inbound::http::files::delete_file,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CredentialRequest,
        TokenResponse,
        ProfileResponse,
        ValidationReportSchema,
        FieldDescriptorSchema,
        SchemaDescriptorsSchema
    )),
    tags(
        (name = "users", description = "Registration, login and profile"),
        (name = "files", description = "Token-guarded blob storage"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::openapi::security::SecurityScheme;

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        let scheme = components
            .security_schemes
            .get(BEARER_SCHEME)
            .expect("bearer scheme");
        assert!(matches!(scheme, SecurityScheme::Http(_)));
    }

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/register",
            "/login",
            "/profile",
            "/files/{name}",
            "/health/ready",
            "/health/live",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn report_schema_is_registered() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        // utoipa replaces :: with . in schema names
        assert!(schemas.contains_key("crate.domain.ValidationReport"));
    }
}
