//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod files;
pub mod health;
pub mod schemas;
pub mod state;
pub mod token_config;
pub mod users;

pub use error::ApiResult;

use actix_web::web;
use tracing::debug;

use crate::domain::{Error, ValidationReport};

/// Largest accepted upload.
pub const MAX_PAYLOAD_BYTES: usize = 32 * 1024 * 1024;

const MALFORMED_BODY: &str = "malformed request body";

/// JSON extractor configuration: unreadable bodies become a 400 report.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!(error = %err, "rejected request body");
        Error::invalid_request(ValidationReport::request_error(MALFORMED_BODY)).into()
    })
}

/// Register every API route with its extractor configuration.
///
/// # Examples
/// ```
/// use actix_web::App;
///
/// let _app = App::new().configure(warden::inbound::http::configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(web::PayloadConfig::new(MAX_PAYLOAD_BYTES))
        .service(users::register)
        .service(users::register_rules)
        .service(users::login)
        .service(users::login_rules)
        .service(users::profile)
        .service(files::put_file)
        .service(files::get_file)
        .service(files::delete_file);
}
