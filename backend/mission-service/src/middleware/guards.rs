//! Typed identity for handlers behind `JwtAuthMiddleware`

use actix_middleware::AuthenticatedUser;
use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::UserRole;

/// Authenticated caller with the role claim parsed.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl AuthUser {
    /// Only volunteer accounts may sign up for missions.
    pub fn require_volunteer(&self) -> Result<(), AppError> {
        if self.role != UserRole::Volunteer {
            return Err(AppError::Forbidden(
                "Only volunteers can sign up for missions".to_string(),
            ));
        }
        Ok(())
    }
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Missing authentication".to_string()))
            .and_then(|user| {
                let role = user
                    .role
                    .parse::<UserRole>()
                    .map_err(|_| AppError::Unauthorized("Unknown role claim".to_string()))?;
                Ok(AuthUser {
                    id: user.user_id,
                    email: user.email,
                    role,
                })
            });
        ready(result)
    }
}
