use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::{ErrorInternalServerError, ErrorUnauthorized},
    Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use serde_json::json;
use std::{
    env,
    future::{ready, Ready},
    rc::Rc,
};

use crate::utils::jwt::verify_jwt;

/// Verifies the `Authorization: Bearer` token and stores the authenticated
/// user id in the request extensions for the handlers.
pub struct AuthMiddleware;

fn unauthorized(message: &str) -> Error {
    ErrorUnauthorized(json!({
        "status": "error",
        "message": message
    }))
}

fn bearer_user_id(req: &ServiceRequest) -> Result<i64, Error> {
    let header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| unauthorized("Invalid token format"))?;

    let secret = env::var("JWT_SECRET").map_err(|_| {
        ErrorInternalServerError(json!({
            "status": "error",
            "message": "JWT secret not configured"
        }))
    })?;

    verify_jwt(token, &secret).map_err(|_| unauthorized("Invalid or expired token"))
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
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
        match bearer_user_id(&req) {
            Ok(user_id) => {
                req.extensions_mut().insert(user_id);
                let service = self.service.clone();
                Box::pin(async move { service.call(req).await })
            }
            Err(e) => Box::pin(async move { Err(e) }),
        }
    }
}
