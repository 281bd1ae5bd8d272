//! Token-guarded blob handlers.
//!
//! ```text
//! PUT /files/{name}     raw body    -> 201, Location: /content/{name}
//! GET /files/{name}                 -> 200, raw bytes
//! DELETE /files/{name}              -> 204
//! ```
//!
//! The path segment reaches the access gate verbatim; the gate decides
//! whether the token and the name are acceptable before any store call.
//! `Content-Length` on downloads comes from the sized body.

use actix_web::http::header::{
    CONTENT_TYPE, ContentDisposition, DispositionParam, DispositionType, LOCATION,
};
use actix_web::{HttpResponse, delete, get, put, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerToken;
use crate::inbound::http::schemas::ValidationReportSchema;
use crate::inbound::http::state::HttpState;

/// Public location of stored content.
const CONTENT_PREFIX: &str = "/content/";

/// Create or replace a blob.
#[utoipa::path(
    put,
    path = "/files/{name}",
    params(("name" = String, Path, description = "Blob name")),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Stored", headers(("Location" = String, description = "Content URL"))),
        (status = 403, description = "Missing or invalid token", body = ValidationReportSchema),
        (status = 503, description = "Name rejected", body = ValidationReportSchema),
        (status = 500, description = "Store failure", body = ValidationReportSchema)
    ),
    tags = ["files"],
    operation_id = "putFile"
)]
#[put("/files/{name}")]
pub async fn put_file(
    state: web::Data<HttpState>,
    token: BearerToken,
    name: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let stored = state.gate.put(token.as_deref(), &name, &body).await?;
    Ok(HttpResponse::Created()
        .insert_header((LOCATION, format!("{CONTENT_PREFIX}{stored}")))
        .finish())
}

/// Download a blob with a sniffed content type.
#[utoipa::path(
    get,
    path = "/files/{name}",
    params(("name" = String, Path, description = "Blob name")),
    responses(
        (status = 200, description = "Blob content", content_type = "application/octet-stream", body = Vec<u8>),
        (status = 403, description = "Missing or invalid token", body = ValidationReportSchema),
        (status = 404, description = "No such blob", body = ValidationReportSchema),
        (status = 503, description = "Name rejected", body = ValidationReportSchema),
        (status = 500, description = "Store failure", body = ValidationReportSchema)
    ),
    tags = ["files"],
    operation_id = "getFile"
)]
#[get("/files/{name}")]
pub async fn get_file(
    state: web::Data<HttpState>,
    token: BearerToken,
    name: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let blob = state.gate.fetch(token.as_deref(), &name).await?;
    let disposition = ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(blob.name.to_string())],
    };
    Ok(HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, blob.content_type))
        .insert_header(disposition)
        .body(blob.content))
}

/// Delete a blob.
#[utoipa::path(
    delete,
    path = "/files/{name}",
    params(("name" = String, Path, description = "Blob name")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Missing or invalid token", body = ValidationReportSchema),
        (status = 404, description = "No such blob", body = ValidationReportSchema),
        (status = 503, description = "Name rejected", body = ValidationReportSchema),
        (status = 500, description = "Store failure", body = ValidationReportSchema)
    ),
    tags = ["files"],
    operation_id = "deleteFile"
)]
#[delete("/files/{name}")]
pub async fn delete_file(
    state: web::Data<HttpState>,
    token: BearerToken,
    name: web::Path<String>,
) -> ApiResult<HttpResponse> {
    state.gate.remove(token.as_deref(), &name).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests;
