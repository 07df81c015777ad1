use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

use super::mission::MissionView;

/// A volunteer's sign-up for a mission. Unique per (mission, user).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionAssignment {
    pub id: Uuid,
    pub mission_id: Uuid,
    pub user_id: Uuid,
    pub assigned_at: DateTime<Utc>,
    pub role_description: Option<String>,
}

/// Outcome of a sign-up attempt. These are expected results, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignResult {
    Success,
    AlreadyAssigned,
    MissionNotFound,
    VolunteerNotFound,
    Error,
}

impl AssignResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignResult::Success => "Success",
            AssignResult::AlreadyAssigned => "AlreadyAssigned",
            AssignResult::MissionNotFound => "MissionNotFound",
            AssignResult::VolunteerNotFound => "VolunteerNotFound",
            AssignResult::Error => "Error",
        }
    }
}

impl fmt::Display for AssignResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    #[validate(length(max = 200))]
    pub role_description: Option<String>,
}

/// Volunteer signed up for a mission, joined with their identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedVolunteer {
    pub user_id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub assigned_at: DateTime<Utc>,
    pub role_description: Option<String>,
}

/// Mission a user signed up for, as returned by `/api/users/{id}/missions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedMission {
    #[serde(flatten)]
    pub mission: MissionView,
    pub assigned_at: DateTime<Utc>,
    pub role_description: Option<String>,
}
