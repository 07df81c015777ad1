//! Mission lifecycle: creation authorization, sign-ups and status-filtered listings.

use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::clock::Clock;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{
    AssignResult, AssignedMission, AssignedVolunteer, CreateMissionRequest, Mission,
    MissionAssignment, MissionStatus, MissionView,
};
use crate::repository::{Repositories, RepositoryError};

#[derive(Clone)]
pub struct MissionService {
    repos: Repositories,
    clock: Arc<dyn Clock>,
}

impl MissionService {
    pub fn new(repos: Repositories, clock: Arc<dyn Clock>) -> Self {
        Self { repos, clock }
    }

    /// Create a mission on behalf of `requester_id` and return its id.
    ///
    /// With an explicit `organization_id` the requester must own that
    /// organization. Without one, the requester's own organization (if any)
    /// is attached; otherwise the mission is privately created.
    pub async fn create_mission(
        &self,
        req: CreateMissionRequest,
        requester_id: Uuid,
    ) -> Result<Uuid> {
        let req = req.trimmed();
        req.validate()?;
        if req.end_time < req.start_time {
            return Err(AppError::BadRequest(
                "endTime must not be before startTime".to_string(),
            ));
        }

        if self.repos.users.find_user(requester_id).await?.is_none() {
            return Err(AppError::UserNotFound(requester_id));
        }

        let created_by_org_id = match req.organization_id {
            Some(org_id) => {
                let organization = self
                    .repos
                    .organizations
                    .find_organization(org_id)
                    .await?
                    .ok_or(AppError::OrganizationNotFound(org_id))?;

                if organization.user_id != requester_id {
                    warn!(
                        user_id = %requester_id,
                        organization_id = %org_id,
                        "Mission creation rejected: requester does not own organization"
                    );
                    return Err(AppError::NotOrganizationOwner);
                }
                Some(organization.id)
            }
            None => self
                .repos
                .organizations
                .find_organization_by_owner(requester_id)
                .await?
                .map(|o| o.id),
        };

        let mission = Mission {
            id: Uuid::new_v4(),
            title: req.title,
            description: req.description,
            location: req.location,
            start_time: req.start_time,
            end_time: req.end_time,
            created_by_user_id: requester_id,
            created_by_org_id,
            created_at: self.clock.now(),
        };

        self.repos.missions.insert_mission(&mission).await?;
        metrics::record_mission_created();

        info!(
            mission_id = %mission.id,
            user_id = %requester_id,
            organization_id = ?created_by_org_id,
            "Mission created"
        );
        Ok(mission.id)
    }

    /// Sign a user up for a mission.
    ///
    /// Lookup failures propagate as errors; a failed insert is reported as
    /// [`AssignResult::Error`].
    pub async fn assign(
        &self,
        mission_id: Uuid,
        user_id: Uuid,
        role_description: Option<String>,
    ) -> Result<AssignResult> {
        let result = self.try_assign(mission_id, user_id, role_description).await?;
        metrics::record_assignment(result);
        Ok(result)
    }

    async fn try_assign(
        &self,
        mission_id: Uuid,
        user_id: Uuid,
        role_description: Option<String>,
    ) -> Result<AssignResult> {
        if self.repos.missions.find_mission(mission_id).await?.is_none() {
            return Ok(AssignResult::MissionNotFound);
        }
        if self.repos.users.find_user(user_id).await?.is_none() {
            return Ok(AssignResult::VolunteerNotFound);
        }
        if self
            .repos
            .assignments
            .assignment_exists(mission_id, user_id)
            .await?
        {
            info!(%mission_id, %user_id, "Duplicate assignment rejected");
            return Ok(AssignResult::AlreadyAssigned);
        }

        let assignment = MissionAssignment {
            id: Uuid::new_v4(),
            mission_id,
            user_id,
            assigned_at: self.clock.now(),
            role_description: role_description
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
        };

        let result = match self.repos.assignments.insert_assignment(&assignment).await {
            Ok(true) => {
                info!(%mission_id, %user_id, "Volunteer assigned");
                AssignResult::Success
            }
            Ok(false) | Err(RepositoryError::UniqueViolation(_)) => {
                info!(%mission_id, %user_id, "Duplicate assignment rejected");
                AssignResult::AlreadyAssigned
            }
            Err(e) => {
                error!(%mission_id, %user_id, error = %e, "Failed to store assignment");
                AssignResult::Error
            }
        };
        Ok(result)
    }

    pub async fn get_mission(&self, mission_id: Uuid) -> Result<MissionView> {
        let mission = self
            .repos
            .missions
            .find_mission(mission_id)
            .await?
            .ok_or(AppError::MissionNotFound(mission_id))?;
        Ok(MissionView::from_mission(mission, self.clock.now()))
    }

    pub async fn list_missions(&self, status: Option<MissionStatus>) -> Result<Vec<MissionView>> {
        let missions = self.repos.missions.list_missions().await?;
        Ok(self.views(missions, status))
    }

    /// Missions the user created personally plus those of the organization they own.
    pub async fn missions_for_creator(
        &self,
        user_id: Uuid,
        status: Option<MissionStatus>,
    ) -> Result<Vec<MissionView>> {
        let organization_id = self
            .repos
            .organizations
            .find_organization_by_owner(user_id)
            .await?
            .map(|o| o.id);

        let missions = self
            .repos
            .missions
            .list_missions_by_creator(user_id, organization_id)
            .await?;
        Ok(self.views(missions, status))
    }

    pub async fn missions_for_organization(
        &self,
        organization_id: Uuid,
        status: Option<MissionStatus>,
    ) -> Result<Vec<MissionView>> {
        if self
            .repos
            .organizations
            .find_organization(organization_id)
            .await?
            .is_none()
        {
            return Err(AppError::OrganizationNotFound(organization_id));
        }

        let missions = self
            .repos
            .missions
            .list_missions_by_organization(organization_id)
            .await?;
        Ok(self.views(missions, status))
    }

    pub async fn volunteers_for_mission(&self, mission_id: Uuid) -> Result<Vec<AssignedVolunteer>> {
        if self.repos.missions.find_mission(mission_id).await?.is_none() {
            return Err(AppError::MissionNotFound(mission_id));
        }
        Ok(self.repos.assignments.list_volunteers(mission_id).await?)
    }

    /// Missions a user signed up for, with status evaluated now.
    pub async fn missions_for_user(&self, user_id: Uuid) -> Result<Vec<AssignedMission>> {
        if self.repos.users.find_user(user_id).await?.is_none() {
            return Err(AppError::UserNotFound(user_id));
        }

        let now = self.clock.now();
        let signups = self.repos.assignments.list_signups(user_id).await?;
        Ok(signups
            .into_iter()
            .map(|s| AssignedMission {
                mission: MissionView::from_mission(s.mission, now),
                assigned_at: s.assigned_at,
                role_description: s.role_description,
            })
            .collect())
    }

    /// Evaluate status once for the whole listing so a filter never splits a
    /// response across two instants.
    fn views(&self, missions: Vec<Mission>, status: Option<MissionStatus>) -> Vec<MissionView> {
        let now = self.clock.now();
        missions
            .into_iter()
            .map(|m| MissionView::from_mission(m, now))
            .filter(|v| status.map_or(true, |s| v.status == s))
            .collect()
    }
}
