use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle phase of a mission. Always derived from the time window, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissionStatus {
    Upcoming,
    Active,
    Completed,
}

impl MissionStatus {
    /// Status of a mission spanning `[start, end]` at instant `now`.
    ///
    /// Both bounds are inclusive, so a zero-length mission is `Active`
    /// exactly at its single instant.
    pub fn at(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if now < start {
            MissionStatus::Upcoming
        } else if now <= end {
            MissionStatus::Active
        } else {
            MissionStatus::Completed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MissionStatus::Upcoming => "Upcoming",
            MissionStatus::Active => "Active",
            MissionStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upcoming" => Ok(MissionStatus::Upcoming),
            "active" => Ok(MissionStatus::Active),
            "completed" => Ok(MissionStatus::Completed),
            other => Err(format!(
                "invalid mission status '{other}' (expected Upcoming, Active or Completed)"
            )),
        }
    }
}

/// Stored mission row. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mission {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_by_user_id: Uuid,
    /// `None` for privately created missions
    pub created_by_org_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Mission {
    pub fn status_at(&self, now: DateTime<Utc>) -> MissionStatus {
        MissionStatus::at(self.start_time, self.end_time, now)
    }
}

/// Mission as returned over HTTP, with the status evaluated at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: MissionStatus,
    pub created_by_user_id: Uuid,
    pub created_by_org_id: Option<Uuid>,
}

impl MissionView {
    pub fn from_mission(mission: Mission, now: DateTime<Utc>) -> Self {
        let status = mission.status_at(now);
        Self {
            id: mission.id,
            title: mission.title,
            description: mission.description,
            location: mission.location,
            start_time: mission.start_time,
            end_time: mission.end_time,
            status,
            created_by_user_id: mission.created_by_user_id,
            created_by_org_id: mission.created_by_org_id,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMissionRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required (max 200 characters)"))]
    pub title: String,
    #[validate(length(min = 1, max = 4000, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, max = 500, message = "Location is required"))]
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Organization to post on behalf of; must be owned by the caller
    pub organization_id: Option<Uuid>,
}

impl CreateMissionRequest {
    /// Strip surrounding whitespace so blank text fails validation.
    pub fn trimmed(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        self.location = self.location.trim().to_string();
        self
    }
}

/// `?status=` filter accepted by the listing endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

impl StatusQuery {
    /// Missing or blank means "no filter".
    pub fn parse(&self) -> Result<Option<MissionStatus>, String> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Utc.with_ymd_and_hms(2025, 6, 14, 10, 0, 0).unwrap();
        (start, start + Duration::hours(3))
    }

    #[test]
    fn test_status_boundaries() {
        let (start, end) = window();
        let second = Duration::seconds(1);

        assert_eq!(MissionStatus::at(start, end, start - second), MissionStatus::Upcoming);
        assert_eq!(MissionStatus::at(start, end, start), MissionStatus::Active);
        assert_eq!(MissionStatus::at(start, end, end), MissionStatus::Active);
        assert_eq!(MissionStatus::at(start, end, end + second), MissionStatus::Completed);
    }

    #[test]
    fn test_zero_length_mission_is_active_only_at_its_instant() {
        let (start, _) = window();
        let ms = Duration::milliseconds(1);

        assert_eq!(MissionStatus::at(start, start, start - ms), MissionStatus::Upcoming);
        assert_eq!(MissionStatus::at(start, start, start), MissionStatus::Active);
        assert_eq!(MissionStatus::at(start, start, start + ms), MissionStatus::Completed);
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("active".parse::<MissionStatus>().unwrap(), MissionStatus::Active);
        assert_eq!("UPCOMING".parse::<MissionStatus>().unwrap(), MissionStatus::Upcoming);
        assert_eq!(" Completed ".parse::<MissionStatus>().unwrap(), MissionStatus::Completed);
        assert!("cancelled".parse::<MissionStatus>().is_err());
    }

    #[test]
    fn test_status_query() {
        assert_eq!(StatusQuery::default().parse().unwrap(), None);
        let blank = StatusQuery { status: Some("  ".into()) };
        assert_eq!(blank.parse().unwrap(), None);
        let active = StatusQuery { status: Some("active".into()) };
        assert_eq!(active.parse().unwrap(), Some(MissionStatus::Active));
        let bad = StatusQuery { status: Some("soon".into()) };
        assert!(bad.parse().is_err());
    }

    #[test]
    fn test_view_serializes_camel_case_with_status() {
        let (start, end) = window();
        let mission = Mission {
            id: Uuid::new_v4(),
            title: "Beach cleanup".into(),
            description: "Collect litter".into(),
            location: "Ribersborg".into(),
            start_time: start,
            end_time: end,
            created_by_user_id: Uuid::new_v4(),
            created_by_org_id: None,
            created_at: start - Duration::days(3),
        };

        let json = serde_json::to_value(MissionView::from_mission(mission, end + Duration::hours(1))).unwrap();
        assert_eq!(json["status"], "Completed");
        assert!(json.get("startTime").is_some());
        assert!(json["createdByOrgId"].is_null());
    }
}
