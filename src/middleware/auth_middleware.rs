//! Bearer authentication middleware for protected scopes.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use log::error;
use std::rc::Rc;

use crate::constants::CODE_INTERNAL_ERROR;
use crate::errors::ApiError;
use crate::services::AuthService;

use super::bearer_token;

/// Authentication middleware.
///
/// Resolves the access token from the Authorization header through the
/// registered [`AuthService`] and adds the resulting `CurrentUser` to the
/// request extensions.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let auth = req
                .app_data::<web::Data<AuthService>>()
                .cloned()
                .ok_or_else(|| {
                    error!("AuthService is not registered as app data");
                    ApiError::internal(CODE_INTERNAL_ERROR, "Authentication is unavailable")
                })?;

            let token = bearer_token(req.headers())?.to_string();
            let current = auth.authenticate(&token).await?;

            req.extensions_mut().insert(current);

            service.call(req).await
        })
    }
}
