//! Account registration and password login.

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::clock::Clock;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{
    AuthResponse, LoginRequest, LoginResponse, OrganizationProfile, RegisterOrganizationRequest,
    RegisterVolunteerRequest, User, UserRole,
};
use crate::repository::{Repositories, RepositoryError};
use crate::security::{hash_password, verify_password};

#[derive(Clone)]
pub struct UserService {
    repos: Repositories,
    clock: Arc<dyn Clock>,
}

/// Blank optional fields are stored as NULL.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn map_duplicate_email(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::UniqueViolation(_) => AppError::EmailTaken,
        other => other.into(),
    }
}

fn issue_token(user: &User) -> Result<String> {
    crypto_core::jwt::generate_access_token(user.id, &user.email, user.role.as_str())
        .map_err(|e| AppError::Internal(format!("Failed to issue access token: {e}")))
}

impl UserService {
    pub fn new(repos: Repositories, clock: Arc<dyn Clock>) -> Self {
        Self { repos, clock }
    }

    pub async fn register_volunteer(&self, req: RegisterVolunteerRequest) -> Result<AuthResponse> {
        let req = req.trimmed();
        req.validate()?;
        let email = req.email.to_lowercase();
        self.ensure_email_free(&email).await?;

        let user = User {
            id: Uuid::new_v4(),
            email,
            password_hash: hash_password(&req.password)?,
            role: UserRole::Volunteer,
            first_name: Some(req.first_name),
            last_name: Some(req.last_name),
            phone_number: non_blank(req.phone_number),
            created_at: self.clock.now(),
        };

        self.repos
            .users
            .create_user(&user)
            .await
            .map_err(map_duplicate_email)?;

        metrics::record_registration(UserRole::Volunteer);
        info!(user_id = %user.id, "Volunteer registered");

        Ok(AuthResponse {
            user_id: user.id,
            token: issue_token(&user)?,
        })
    }

    /// Register an organization account together with its profile.
    pub async fn register_organization(
        &self,
        req: RegisterOrganizationRequest,
    ) -> Result<AuthResponse> {
        let req = req.trimmed();
        req.validate()?;
        let email = req.email.to_lowercase();
        self.ensure_email_free(&email).await?;

        let now = self.clock.now();
        let contact_person = non_blank(req.contact_person);
        let phone_number = non_blank(req.phone_number);

        let user = User {
            id: Uuid::new_v4(),
            email,
            password_hash: hash_password(&req.password)?,
            role: UserRole::Organization,
            first_name: contact_person.clone(),
            last_name: None,
            phone_number: phone_number.clone(),
            created_at: now,
        };

        let profile = OrganizationProfile {
            id: Uuid::new_v4(),
            user_id: user.id,
            organization_name: req.organization_name,
            contact_person,
            phone_number,
            website: non_blank(req.website),
            created_at: now,
        };

        self.repos
            .users
            .create_organization_account(&user, &profile)
            .await
            .map_err(map_duplicate_email)?;

        metrics::record_registration(UserRole::Organization);
        info!(user_id = %user.id, organization_id = %profile.id, "Organization registered");

        Ok(AuthResponse {
            user_id: user.id,
            token: issue_token(&user)?,
        })
    }

    /// Check credentials. Unknown email and wrong password are indistinguishable.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let user = self
            .repos
            .users
            .find_user_by_email(email.trim())
            .await?;

        let Some(user) = user else {
            warn!("Login failed: unknown email");
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse> {
        req.validate()?;

        let user = match self.authenticate(&req.email, &req.password).await {
            Ok(user) => user,
            Err(e) => {
                metrics::record_login(false);
                return Err(e);
            }
        };
        metrics::record_login(true);

        Ok(LoginResponse {
            user_id: user.id,
            token: issue_token(&user)?,
            email: user.email,
            role: user.role,
        })
    }

    async fn ensure_email_free(&self, email: &str) -> Result<()> {
        if self.repos.users.find_user_by_email(email).await?.is_some() {
            return Err(AppError::EmailTaken);
        }
        Ok(())
    }
}
