//! Liveness and database health endpoints.

use actix_web::{web, HttpResponse};
use async_trait::async_trait;
use log::error;
use mongodb::bson::{doc, Bson};

use crate::constants::{
    CODE_DATABASE_UNAVAILABLE, ERR_DATABASE_CONNECTION, ERR_DATABASE_MISCONFIGURED, MSG_DATABASE_OK,
    MSG_ROOT,
};
use crate::errors::ApiError;
use crate::models::MessageResponse;

/// Round-trip check against the backing database.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// `Ok(false)` means the database answered but not as expected.
    async fn ping(&self) -> Result<bool, ApiError>;
}

#[async_trait]
impl HealthProbe for mongodb::Database {
    async fn ping(&self) -> Result<bool, ApiError> {
        let reply = self.run_command(doc! { "ping": 1 }).await?;
        Ok(match reply.get("ok") {
            Some(Bson::Double(ok)) => *ok == 1.0,
            Some(Bson::Int32(ok)) => *ok == 1,
            Some(Bson::Int64(ok)) => *ok == 1,
            _ => false,
        })
    }
}

/// Service root
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 200, description = "Service is running", body = MessageResponse)
    )
)]
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse::new(MSG_ROOT))
}

/// Check that the database is reachable
#[utoipa::path(
    get,
    path = "/api/database_checker",
    tag = "Health",
    responses(
        (status = 200, description = "Database reachable", body = MessageResponse),
        (status = 500, description = "Database unavailable", body = crate::models::ErrorResponse)
    )
)]
pub async fn database_checker(
    probe: web::Data<dyn HealthProbe>,
) -> Result<HttpResponse, ApiError> {
    match probe.ping().await {
        Ok(true) => Ok(HttpResponse::Ok().json(MessageResponse::new(MSG_DATABASE_OK))),
        Ok(false) => Err(ApiError::internal(
            CODE_DATABASE_UNAVAILABLE,
            ERR_DATABASE_MISCONFIGURED,
        )),
        Err(e) => {
            error!("Database health check failed: {}", e);
            Err(ApiError::internal(
                CODE_DATABASE_UNAVAILABLE,
                ERR_DATABASE_CONNECTION,
            ))
        }
    }
}
