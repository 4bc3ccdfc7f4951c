//! HTTP request handlers organized by domain.

pub mod auth_handler;
pub mod contact_handler;
pub mod health_handler;
pub mod user_handler;

pub use auth_handler::*;
pub use contact_handler::*;
pub use health_handler::*;
pub use user_handler::*;

use actix_web::HttpRequest;

/// Base URL of the API as seen by the client, ending in `/`.
pub(crate) fn base_url(req: &HttpRequest) -> String {
    let info = req.connection_info();
    format!("{}://{}/", info.scheme(), info.host())
}
