/// Error types for Mission Service
///
/// Failures are rendered as the shared `ErrorResponse` body. Server-side
/// errors are logged with their detail and answered with a generic message.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use error_types::{error_codes, error_types as kinds, reason_phrase, ErrorResponse};
use thiserror::Error;
use uuid::Uuid;

use crate::repository::RepositoryError;

/// Result type for mission-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Mission {0} not found")]
    MissionNotFound(Uuid),

    #[error("User {0} not found")]
    UserNotFound(Uuid),

    #[error("Organization {0} not found")]
    OrganizationNotFound(Uuid),

    #[error("Volunteer is already assigned to this mission")]
    AlreadyAssigned,

    #[error("You do not own this organization")]
    NotOrganizationOwner,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email is already registered")]
    EmailTaken,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::MissionNotFound(_) => error_codes::MISSION_NOT_FOUND,
            AppError::UserNotFound(_) => error_codes::USER_NOT_FOUND,
            AppError::OrganizationNotFound(_) => error_codes::ORGANIZATION_NOT_FOUND,
            AppError::AlreadyAssigned => error_codes::ALREADY_ASSIGNED,
            AppError::NotOrganizationOwner => error_codes::NOT_ORGANIZATION_OWNER,
            AppError::InvalidCredentials => error_codes::INVALID_CREDENTIALS,
            AppError::EmailTaken => error_codes::USER_ALREADY_EXISTS,
            AppError::Conflict(_) => error_codes::CONFLICT,
            AppError::Forbidden(_) => error_codes::FORBIDDEN,
            AppError::Unauthorized(_) => error_codes::TOKEN_INVALID,
            AppError::BadRequest(_) => error_codes::INVALID_REQUEST,
            AppError::Validation(_) => error_codes::VALIDATION_ERROR,
            AppError::Database(_) => error_codes::DATABASE_ERROR,
            AppError::Internal(_) => error_codes::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self.status_code() {
            StatusCode::BAD_REQUEST => kinds::VALIDATION_ERROR,
            StatusCode::UNAUTHORIZED => kinds::AUTHENTICATION_ERROR,
            StatusCode::FORBIDDEN => kinds::AUTHORIZATION_ERROR,
            StatusCode::NOT_FOUND => kinds::NOT_FOUND_ERROR,
            StatusCode::CONFLICT => kinds::CONFLICT_ERROR,
            _ => kinds::SERVER_ERROR,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissionNotFound(_)
            | AppError::UserNotFound(_)
            | AppError::OrganizationNotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyAssigned | AppError::EmailTaken | AppError::Conflict(_) => {
                StatusCode::CONFLICT
            }
            AppError::NotOrganizationOwner | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::InvalidCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Request failed with server error");
            "An unexpected error occurred".to_string()
        } else {
            self.to_string()
        };

        let response = ErrorResponse::new(
            reason_phrase(status.as_u16()),
            &message,
            status.as_u16(),
            self.kind(),
            self.code(),
        );

        HttpResponse::build(status).json(response)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UniqueViolation(constraint) => {
                AppError::Conflict(format!("duplicate value violates {constraint}"))
            }
            RepositoryError::Database(e) => AppError::Database(e.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(err: AppError) -> serde_json::Value {
        let resp = err.error_response();
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::MissionNotFound(Uuid::nil()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::AlreadyAssigned.status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::NotOrganizationOwner.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Database("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_domain_error_body_carries_code() {
        let json = body_json(AppError::AlreadyAssigned).await;
        assert_eq!(json["status"], 409);
        assert_eq!(json["code"], error_codes::ALREADY_ASSIGNED);
        assert_eq!(json["errorType"], kinds::CONFLICT_ERROR);
    }

    #[actix_web::test]
    async fn test_server_error_hides_detail() {
        let json = body_json(AppError::Database("relation missions does not exist".into())).await;
        assert_eq!(json["status"], 500);
        assert_eq!(json["message"], "An unexpected error occurred");
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let err: AppError = RepositoryError::UniqueViolation("users_email_lower_idx".into()).into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}
