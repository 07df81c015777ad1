use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    Error, HttpMessage, HttpResponse,
};
use error_types::{error_codes, error_types::AUTHENTICATION_ERROR, ErrorResponse};
use futures::future::{ready, Ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use uuid::Uuid;

/// User ID extracted from JWT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub Uuid);

/// Identity recovered from a validated bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    /// Raw role claim; services parse it into their own role type.
    pub role: String,
}

/// JWT Authentication Middleware
///
/// Rejects requests without a valid `Authorization: Bearer <jwt>` header and
/// stores both [`UserId`] and [`AuthenticatedUser`] in request extensions.
pub struct JwtAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = JwtAuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let auth_header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .ok_or_else(|| unauthorized(error_codes::TOKEN_MISSING, "Missing Authorization header"))?;

            let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
                unauthorized(error_codes::TOKEN_INVALID, "Invalid Authorization header format")
            })?;

            let token_data = crypto_core::jwt::validate_token(token).map_err(|e| {
                tracing::warn!("JWT validation failed: {}", e);
                unauthorized(error_codes::TOKEN_INVALID, "Invalid or expired token")
            })?;

            let user_id = Uuid::parse_str(&token_data.claims.sub).map_err(|e| {
                tracing::error!("Invalid user_id UUID in token: {}", e);
                unauthorized(error_codes::TOKEN_INVALID, "Invalid token: malformed user_id")
            })?;

            req.extensions_mut().insert(UserId(user_id));
            req.extensions_mut().insert(AuthenticatedUser {
                user_id,
                email: token_data.claims.email,
                role: token_data.claims.role,
            });

            service.call(req).await
        })
    }
}

fn unauthorized(code: &str, message: &str) -> Error {
    let body = ErrorResponse::new(
        "Unauthorized",
        message,
        401,
        AUTHENTICATION_ERROR,
        code,
    );
    InternalError::from_response(message.to_string(), HttpResponse::Unauthorized().json(body))
        .into()
}

impl actix_web::FromRequest for UserId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        match req.extensions().get::<UserId>() {
            Some(user_id) => ready(Ok(*user_id)),
            None => ready(Err(unauthorized(
                error_codes::TOKEN_MISSING,
                "User not authenticated",
            ))),
        }
    }
}

impl actix_web::FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(unauthorized(
                error_codes::TOKEN_MISSING,
                "User not authenticated",
            ))),
        }
    }
}
