//! Storage seams for the mission service.
//!
//! Each aggregate gets its own trait so services only see the operations they
//! need. [`PgStore`] is the production implementation; [`InMemoryStore`] backs
//! local runs and tests. Both enforce one assignment per (mission, user).

mod memory;
mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    AssignedVolunteer, MemberView, Mission, MissionAssignment, OrganizationProfile, User,
};

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A unique constraint rejected the write; carries the constraint name
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RepoResult<T> = std::result::Result<T, RepositoryError>;

/// Assignment row joined with the mission it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionSignup {
    pub mission: Mission,
    pub assigned_at: DateTime<Utc>,
    pub role_description: Option<String>,
}

#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user(&self, id: Uuid) -> RepoResult<Option<User>>;

    /// Case-insensitive lookup
    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Insert a volunteer account. Duplicate email → `UniqueViolation`.
    async fn create_user(&self, user: &User) -> RepoResult<()>;

    /// Insert an organization account, its profile and the owner membership
    /// atomically. Nothing is written if any part fails.
    async fn create_organization_account(
        &self,
        user: &User,
        profile: &OrganizationProfile,
    ) -> RepoResult<()>;
}

#[async_trait::async_trait]
pub trait OrganizationRepository: Send + Sync {
    async fn find_organization(&self, id: Uuid) -> RepoResult<Option<OrganizationProfile>>;

    async fn find_organization_by_owner(
        &self,
        user_id: Uuid,
    ) -> RepoResult<Option<OrganizationProfile>>;

    async fn list_organizations(&self) -> RepoResult<Vec<OrganizationProfile>>;

    /// Insert a profile plus the owner membership. A second profile for the
    /// same user → `UniqueViolation`.
    async fn create_organization(&self, profile: &OrganizationProfile) -> RepoResult<()>;

    async fn list_members(&self, organization_id: Uuid) -> RepoResult<Vec<MemberView>>;
}

#[async_trait::async_trait]
pub trait MissionRepository: Send + Sync {
    async fn insert_mission(&self, mission: &Mission) -> RepoResult<()>;

    async fn find_mission(&self, id: Uuid) -> RepoResult<Option<Mission>>;

    /// All missions ordered by start time
    async fn list_missions(&self) -> RepoResult<Vec<Mission>>;

    /// Missions created by `user_id` personally or posted by `organization_id`
    async fn list_missions_by_creator(
        &self,
        user_id: Uuid,
        organization_id: Option<Uuid>,
    ) -> RepoResult<Vec<Mission>>;

    async fn list_missions_by_organization(&self, organization_id: Uuid)
        -> RepoResult<Vec<Mission>>;
}

#[async_trait::async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn assignment_exists(&self, mission_id: Uuid, user_id: Uuid) -> RepoResult<bool>;

    /// Insert unless the (mission, user) pair already exists.
    ///
    /// Returns `false` when an existing row won; the check and the write are a
    /// single atomic step.
    async fn insert_assignment(&self, assignment: &MissionAssignment) -> RepoResult<bool>;

    async fn list_volunteers(&self, mission_id: Uuid) -> RepoResult<Vec<AssignedVolunteer>>;

    async fn list_signups(&self, user_id: Uuid) -> RepoResult<Vec<MissionSignup>>;
}

/// Handles to every repository, shared by the services.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub organizations: Arc<dyn OrganizationRepository>,
    pub missions: Arc<dyn MissionRepository>,
    pub assignments: Arc<dyn AssignmentRepository>,
}

impl Repositories {
    /// Use one store for all four aggregates.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepository
            + OrganizationRepository
            + MissionRepository
            + AssignmentRepository
            + 'static,
    {
        Self {
            users: store.clone(),
            organizations: store.clone(),
            missions: store.clone(),
            assignments: store,
        }
    }
}
