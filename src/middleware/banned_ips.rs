//! Rejects requests from banned client addresses.

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, ResponseError,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use log::warn;
use std::collections::HashSet;
use std::net::IpAddr;
use std::rc::Rc;
use std::sync::Arc;

use crate::constants::{CODE_BANNED, ERR_BANNED};
use crate::errors::ApiError;

/// Middleware answering 403 to peers in the ban list.
#[derive(Clone)]
pub struct BannedIps {
    banned: Arc<HashSet<IpAddr>>,
}

impl BannedIps {
    pub fn new(ips: impl IntoIterator<Item = IpAddr>) -> Self {
        Self {
            banned: Arc::new(ips.into_iter().collect()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BannedIps
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = BannedIpsService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(BannedIpsService {
            service: Rc::new(service),
            banned: Arc::clone(&self.banned),
        })
    }
}

pub struct BannedIpsService<S> {
    service: Rc<S>,
    banned: Arc<HashSet<IpAddr>>,
}

impl<S, B> Service<ServiceRequest> for BannedIpsService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let peer = req.peer_addr().map(|addr| addr.ip());

        if let Some(ip) = peer.filter(|ip| self.banned.contains(ip)) {
            warn!("Rejected request from banned address {}", ip);
            let response = ApiError::forbidden(CODE_BANNED, ERR_BANNED)
                .error_response()
                .map_into_right_body();
            let (req, _) = req.into_parts();
            return Box::pin(async move { Ok(ServiceResponse::new(req, response)) });
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};

    #[actix_web::test]
    async fn banned_peer_gets_forbidden() {
        let app = test::init_service(
            App::new()
                .wrap(BannedIps::new(["10.0.0.1".parse().unwrap()]))
                .route("/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let banned = test::TestRequest::get()
            .uri("/")
            .peer_addr("10.0.0.1:4000".parse().unwrap())
            .to_request();
        let resp = test::call_service(&app, banned).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "You are banned");

        let allowed = test::TestRequest::get()
            .uri("/")
            .peer_addr("10.0.0.2:4000".parse().unwrap())
            .to_request();
        assert_eq!(
            test::call_service(&app, allowed).await.status(),
            StatusCode::OK
        );
    }
}
