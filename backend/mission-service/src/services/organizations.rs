use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::clock::Clock;
use crate::error::{AppError, Result};
use crate::models::{CreateOrganizationRequest, MemberView, OrganizationProfile};
use crate::repository::{Repositories, RepositoryError};

#[derive(Clone)]
pub struct OrganizationService {
    repos: Repositories,
    clock: Arc<dyn Clock>,
}

impl OrganizationService {
    pub fn new(repos: Repositories, clock: Arc<dyn Clock>) -> Self {
        Self { repos, clock }
    }

    /// Create the caller's organization profile. One profile per account.
    pub async fn create(
        &self,
        owner_id: Uuid,
        req: CreateOrganizationRequest,
    ) -> Result<OrganizationProfile> {
        let req = req.trimmed();
        req.validate()?;

        if self.repos.users.find_user(owner_id).await?.is_none() {
            return Err(AppError::UserNotFound(owner_id));
        }
        if self
            .repos
            .organizations
            .find_organization_by_owner(owner_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "This account already has an organization profile".to_string(),
            ));
        }

        let profile = OrganizationProfile {
            id: Uuid::new_v4(),
            user_id: owner_id,
            organization_name: req.organization_name,
            contact_person: req.contact_person,
            phone_number: req.phone_number,
            website: req.website,
            created_at: self.clock.now(),
        };

        self.repos
            .organizations
            .create_organization(&profile)
            .await
            .map_err(|e| match e {
                RepositoryError::UniqueViolation(_) => AppError::Conflict(
                    "This account already has an organization profile".to_string(),
                ),
                other => other.into(),
            })?;

        info!(organization_id = %profile.id, user_id = %owner_id, "Organization profile created");
        Ok(profile)
    }

    pub async fn get(&self, organization_id: Uuid) -> Result<OrganizationProfile> {
        self.repos
            .organizations
            .find_organization(organization_id)
            .await?
            .ok_or(AppError::OrganizationNotFound(organization_id))
    }

    pub async fn list(&self) -> Result<Vec<OrganizationProfile>> {
        Ok(self.repos.organizations.list_organizations().await?)
    }

    pub async fn members(&self, organization_id: Uuid) -> Result<Vec<MemberView>> {
        self.get(organization_id).await?;
        Ok(self.repos.organizations.list_members(organization_id).await?)
    }
}
