use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    AssignmentRepository, MissionRepository, MissionSignup, OrganizationRepository, RepoResult,
    RepositoryError, UserRepository,
};
use crate::models::{
    AssignedVolunteer, MemberView, Mission, MissionAssignment, OrganizationProfile, User,
    OWNER_MEMBER_ROLE,
};

#[derive(Debug, Clone)]
struct MemberRow {
    organization_id: Uuid,
    user_id: Uuid,
    role: String,
    joined_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    organizations: HashMap<Uuid, OrganizationProfile>,
    members: Vec<MemberRow>,
    missions: HashMap<Uuid, Mission>,
    assignments: Vec<MissionAssignment>,
}

impl Tables {
    fn email_taken(&self, email: &str) -> bool {
        self.users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email))
    }

    fn owner_has_profile(&self, user_id: Uuid) -> bool {
        self.organizations.values().any(|o| o.user_id == user_id)
    }

    fn add_owner(&mut self, profile: &OrganizationProfile) {
        self.members.push(MemberRow {
            organization_id: profile.id,
            user_id: profile.user_id,
            role: OWNER_MEMBER_ROLE.to_string(),
            joined_at: profile.created_at,
        });
    }
}

/// Process-local store. Every write takes the single table lock, so
/// check-then-insert sequences are atomic.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored assignment rows for a pair. Used by tests.
    pub async fn assignment_count(&self, mission_id: Uuid, user_id: Uuid) -> usize {
        self.tables
            .read()
            .await
            .assignments
            .iter()
            .filter(|a| a.mission_id == mission_id && a.user_id == user_id)
            .count()
    }

    pub async fn mission_count(&self) -> usize {
        self.tables.read().await.missions.len()
    }

    /// Delete a mission and, like the foreign key cascade, its assignments.
    pub async fn delete_mission(&self, mission_id: Uuid) -> bool {
        let mut tables = self.tables.write().await;
        tables.assignments.retain(|a| a.mission_id != mission_id);
        tables.missions.remove(&mission_id).is_some()
    }
}

fn sorted_by_start(mut missions: Vec<Mission>) -> Vec<Mission> {
    missions.sort_by(|a, b| {
        a.start_time
            .cmp(&b.start_time)
            .then(a.created_at.cmp(&b.created_at))
    });
    missions
}

#[async_trait::async_trait]
impl UserRepository for InMemoryStore {
    async fn find_user(&self, id: Uuid) -> RepoResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create_user(&self, user: &User) -> RepoResult<()> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&user.email) {
            return Err(RepositoryError::UniqueViolation(
                "users_email_lower_idx".to_string(),
            ));
        }
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn create_organization_account(
        &self,
        user: &User,
        profile: &OrganizationProfile,
    ) -> RepoResult<()> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&user.email) {
            return Err(RepositoryError::UniqueViolation(
                "users_email_lower_idx".to_string(),
            ));
        }
        tables.users.insert(user.id, user.clone());
        tables.organizations.insert(profile.id, profile.clone());
        tables.add_owner(profile);
        Ok(())
    }
}

#[async_trait::async_trait]
impl OrganizationRepository for InMemoryStore {
    async fn find_organization(&self, id: Uuid) -> RepoResult<Option<OrganizationProfile>> {
        Ok(self.tables.read().await.organizations.get(&id).cloned())
    }

    async fn find_organization_by_owner(
        &self,
        user_id: Uuid,
    ) -> RepoResult<Option<OrganizationProfile>> {
        Ok(self
            .tables
            .read()
            .await
            .organizations
            .values()
            .find(|o| o.user_id == user_id)
            .cloned())
    }

    async fn list_organizations(&self) -> RepoResult<Vec<OrganizationProfile>> {
        let mut organizations: Vec<_> = self
            .tables
            .read()
            .await
            .organizations
            .values()
            .cloned()
            .collect();
        organizations.sort_by(|a, b| a.organization_name.cmp(&b.organization_name));
        Ok(organizations)
    }

    async fn create_organization(&self, profile: &OrganizationProfile) -> RepoResult<()> {
        let mut tables = self.tables.write().await;
        if tables.owner_has_profile(profile.user_id) {
            return Err(RepositoryError::UniqueViolation(
                "organization_profiles_user_id_key".to_string(),
            ));
        }
        tables.organizations.insert(profile.id, profile.clone());
        tables.add_owner(profile);
        Ok(())
    }

    async fn list_members(&self, organization_id: Uuid) -> RepoResult<Vec<MemberView>> {
        let tables = self.tables.read().await;
        let mut members: Vec<MemberView> = tables
            .members
            .iter()
            .filter(|m| m.organization_id == organization_id)
            .filter_map(|m| {
                tables.users.get(&m.user_id).map(|u| MemberView {
                    user_id: u.id,
                    first_name: u.first_name.clone(),
                    last_name: u.last_name.clone(),
                    email: u.email.clone(),
                    role: m.role.clone(),
                    joined_at: m.joined_at,
                })
            })
            .collect();
        members.sort_by(|a, b| a.joined_at.cmp(&b.joined_at));
        Ok(members)
    }
}

#[async_trait::async_trait]
impl MissionRepository for InMemoryStore {
    async fn insert_mission(&self, mission: &Mission) -> RepoResult<()> {
        self.tables
            .write()
            .await
            .missions
            .insert(mission.id, mission.clone());
        Ok(())
    }

    async fn find_mission(&self, id: Uuid) -> RepoResult<Option<Mission>> {
        Ok(self.tables.read().await.missions.get(&id).cloned())
    }

    async fn list_missions(&self) -> RepoResult<Vec<Mission>> {
        let missions = self.tables.read().await.missions.values().cloned().collect();
        Ok(sorted_by_start(missions))
    }

    async fn list_missions_by_creator(
        &self,
        user_id: Uuid,
        organization_id: Option<Uuid>,
    ) -> RepoResult<Vec<Mission>> {
        let missions = self
            .tables
            .read()
            .await
            .missions
            .values()
            .filter(|m| {
                m.created_by_user_id == user_id
                    || (organization_id.is_some() && m.created_by_org_id == organization_id)
            })
            .cloned()
            .collect();
        Ok(sorted_by_start(missions))
    }

    async fn list_missions_by_organization(
        &self,
        organization_id: Uuid,
    ) -> RepoResult<Vec<Mission>> {
        let missions = self
            .tables
            .read()
            .await
            .missions
            .values()
            .filter(|m| m.created_by_org_id == Some(organization_id))
            .cloned()
            .collect();
        Ok(sorted_by_start(missions))
    }
}

#[async_trait::async_trait]
impl AssignmentRepository for InMemoryStore {
    async fn assignment_exists(&self, mission_id: Uuid, user_id: Uuid) -> RepoResult<bool> {
        Ok(self
            .tables
            .read()
            .await
            .assignments
            .iter()
            .any(|a| a.mission_id == mission_id && a.user_id == user_id))
    }

    async fn insert_assignment(&self, assignment: &MissionAssignment) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        let exists = tables
            .assignments
            .iter()
            .any(|a| a.mission_id == assignment.mission_id && a.user_id == assignment.user_id);
        if exists {
            return Ok(false);
        }
        tables.assignments.push(assignment.clone());
        Ok(true)
    }

    async fn list_volunteers(&self, mission_id: Uuid) -> RepoResult<Vec<AssignedVolunteer>> {
        let tables = self.tables.read().await;
        let mut volunteers: Vec<AssignedVolunteer> = tables
            .assignments
            .iter()
            .filter(|a| a.mission_id == mission_id)
            .filter_map(|a| {
                tables.users.get(&a.user_id).map(|u| AssignedVolunteer {
                    user_id: u.id,
                    first_name: u.first_name.clone(),
                    last_name: u.last_name.clone(),
                    email: u.email.clone(),
                    assigned_at: a.assigned_at,
                    role_description: a.role_description.clone(),
                })
            })
            .collect();
        volunteers.sort_by(|a, b| a.assigned_at.cmp(&b.assigned_at));
        Ok(volunteers)
    }

    async fn list_signups(&self, user_id: Uuid) -> RepoResult<Vec<MissionSignup>> {
        let tables = self.tables.read().await;
        let mut signups: Vec<MissionSignup> = tables
            .assignments
            .iter()
            .filter(|a| a.user_id == user_id)
            .filter_map(|a| {
                tables.missions.get(&a.mission_id).map(|m| MissionSignup {
                    mission: m.clone(),
                    assigned_at: a.assigned_at,
                    role_description: a.role_description.clone(),
                })
            })
            .collect();
        signups.sort_by(|a, b| a.mission.start_time.cmp(&b.mission.start_time));
        Ok(signups)
    }
}
