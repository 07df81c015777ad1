use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Membership role given to the account that created the profile.
pub const OWNER_MEMBER_ROLE: &str = "Owner";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationProfile {
    pub id: Uuid,
    /// Owning account; one profile per user
    pub user_id: Uuid,
    pub organization_name: String,
    pub contact_person: Option<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 1, max = 200, message = "Organization name is required"))]
    pub organization_name: String,
    #[validate(length(max = 200))]
    pub contact_person: Option<String>,
    #[validate(length(max = 32))]
    pub phone_number: Option<String>,
    #[validate(length(max = 255))]
    pub website: Option<String>,
}

impl CreateOrganizationRequest {
    pub fn trimmed(mut self) -> Self {
        self.organization_name = self.organization_name.trim().to_string();
        self
    }
}

/// Organization member joined with the member's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberView {
    pub user_id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}
