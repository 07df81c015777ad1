//! Demo data for local runs.
//!
//! Inserts one organization account and a mission in each status bucket so
//! a fresh development server has something to list. Never runs in production.

use chrono::Duration;
use tracing::info;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::Result;
use crate::models::{Mission, OrganizationProfile, User, UserRole};
use crate::repository::Repositories;
use crate::security::hash_password;

pub const DEMO_ORGANIZATION_EMAIL: &str = "mock_orguser@test.com";
const DEMO_PASSWORD: &str = "supersecret123";

/// Seed the demo organization and missions. Each part is skipped when the
/// store already has data of that kind.
pub async fn seed_demo_data(repos: &Repositories, clock: &dyn Clock) -> Result<()> {
    let now = clock.now();

    let owner = match repos
        .users
        .find_user_by_email(DEMO_ORGANIZATION_EMAIL)
        .await?
    {
        Some(user) => user,
        None => {
            let user = User {
                id: Uuid::new_v4(),
                email: DEMO_ORGANIZATION_EMAIL.to_string(),
                password_hash: hash_password(DEMO_PASSWORD)?,
                role: UserRole::Organization,
                first_name: Some("Mock Contact".to_string()),
                last_name: None,
                phone_number: Some("0700000000".to_string()),
                created_at: now,
            };
            let profile = OrganizationProfile {
                id: Uuid::new_v4(),
                user_id: user.id,
                organization_name: "Mock Organization".to_string(),
                contact_person: Some("Mock Contact".to_string()),
                phone_number: Some("0700000000".to_string()),
                website: Some("https://mock.org".to_string()),
                created_at: now,
            };
            repos.users.create_organization_account(&user, &profile).await?;
            info!(user_id = %user.id, "Seeded demo organization");
            user
        }
    };

    if !repos.missions.list_missions().await?.is_empty() {
        return Ok(());
    }

    let organization_id = repos
        .organizations
        .find_organization_by_owner(owner.id)
        .await?
        .map(|o| o.id);

    let windows = [
        ("Completed Mission", "This mission has already ended.", "Old Town", Duration::days(-10), Duration::days(-5)),
        ("Active Mission", "This mission is happening now.", "Main Square", Duration::hours(-1), Duration::hours(2)),
        ("Upcoming Mission", "This mission will happen in the future.", "New District", Duration::days(3), Duration::days(5)),
    ];
    for (title, description, location, starts, ends) in windows {
        let mission = Mission {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            location: location.to_string(),
            start_time: now + starts,
            end_time: now + ends,
            created_by_user_id: owner.id,
            created_by_org_id: organization_id,
            created_at: now,
        };
        repos.missions.insert_mission(&mission).await?;
    }
    info!(count = windows.len(), "Seeded demo missions");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::models::MissionStatus;
    use crate::repository::InMemoryStore;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_seed_covers_every_status_once() {
        let store = Arc::new(InMemoryStore::new());
        let repos = Repositories::from_store(store.clone());
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap());

        seed_demo_data(&repos, &clock).await.unwrap();
        seed_demo_data(&repos, &clock).await.unwrap();

        let missions = repos.missions.list_missions().await.unwrap();
        assert_eq!(missions.len(), 3);
        let mut statuses: Vec<_> = missions.iter().map(|m| m.status_at(clock.now())).collect();
        statuses.sort_by_key(|s| s.to_string());
        assert_eq!(
            statuses,
            vec![MissionStatus::Active, MissionStatus::Completed, MissionStatus::Upcoming]
        );

        let organizations = repos.organizations.list_organizations().await.unwrap();
        assert_eq!(organizations.len(), 1);
        assert!(missions
            .iter()
            .all(|m| m.created_by_org_id == Some(organizations[0].id)));
    }
}
