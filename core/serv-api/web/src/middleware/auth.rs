use actix_service::{Service, Transform};
use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpResponse};
use futures::future::{ok, LocalBoxFuture, Ready};
use std::sync::Arc;
use std::task::{Context, Poll};

use orgdir_model::{ErrorMessage, API_KEY_HEADER};

/// Same answer for a missing and for a wrong key.
pub const FORBIDDEN_MESSAGE: &str = "Invalid or missing API key";

/// Rejects with 403 every request whose `X-API-Key` header is not the
/// configured shared secret.
#[derive(Clone)]
pub struct ApiKeyAuth {
    key: Arc<str>,
}

impl ApiKeyAuth {
    pub fn new(key: impl Into<String>) -> Self {
        ApiKeyAuth {
            key: Arc::from(key.into()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiKeyAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = ApiKeyAuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(ApiKeyAuthMiddleware {
            service,
            key: self.key.clone(),
        })
    }
}

pub struct ApiKeyAuthMiddleware<S> {
    service: S,
    key: Arc<str>,
}

impl<S> ApiKeyAuthMiddleware<S> {
    fn is_authorized(&self, req: &ServiceRequest) -> bool {
        req.headers()
            .get(API_KEY_HEADER)
            .map(|value| value.as_bytes() == self.key.as_bytes())
            .unwrap_or(false)
    }
}

impl<S, B> Service<ServiceRequest> for ApiKeyAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if !self.is_authorized(&req) {
            log::warn!("{} {} rejected: {}", req.method(), req.path(), FORBIDDEN_MESSAGE);
            let response = HttpResponse::Forbidden().json(ErrorMessage::new(FORBIDDEN_MESSAGE));
            return Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) });
        }

        let fut = self.service.call(req);
        Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
    }
}
