//! Shared fixtures: in-memory store, manual clock and seeded accounts.
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use crypto_core::testing::{init_test_keys, TEST_PRIVATE_KEY, TEST_PUBLIC_KEY};
use mission_service::clock::ManualClock;
use mission_service::config::{AppConfig, Config, JwtConfig, StorageBackend};
use mission_service::models::{CreateMissionRequest, OrganizationProfile, User, UserRole};
use mission_service::repository::{InMemoryStore, OrganizationRepository, UserRepository};
use mission_service::AppState;
use std::sync::Arc;
use uuid::Uuid;

pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<ManualClock>,
    pub state: AppState,
}

/// Fixed starting instant so assertions never depend on the wall clock.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap()
}

pub fn test_config() -> Config {
    Config {
        app: AppConfig {
            env: "test".into(),
            host: "127.0.0.1".into(),
            port: 0,
        },
        storage: StorageBackend::Memory,
        database: None,
        seed_demo_data: false,
        jwt: JwtConfig {
            private_key_pem: TEST_PRIVATE_KEY.into(),
            public_key_pem: TEST_PUBLIC_KEY.into(),
        },
    }
}

pub fn setup() -> TestContext {
    init_test_keys();
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(ManualClock::new(epoch()));
    let state = AppState::new(store.clone(), clock.clone(), test_config(), None);
    TestContext { store, clock, state }
}

fn user(email: &str, role: UserRole) -> User {
    User {
        id: Uuid::new_v4(),
        email: email.to_lowercase(),
        password_hash: "not-used".into(),
        role,
        first_name: Some("Test".into()),
        last_name: Some(email.split('@').next().unwrap_or("user").into()),
        phone_number: None,
        created_at: epoch(),
    }
}

/// Insert a volunteer directly, skipping password hashing.
pub async fn seed_volunteer(store: &InMemoryStore, email: &str) -> User {
    let volunteer = user(email, UserRole::Volunteer);
    store.create_user(&volunteer).await.unwrap();
    volunteer
}

/// Insert an organization account with its profile.
pub async fn seed_organization(store: &InMemoryStore, email: &str, name: &str) -> (User, OrganizationProfile) {
    let owner = user(email, UserRole::Organization);
    let profile = OrganizationProfile {
        id: Uuid::new_v4(),
        user_id: owner.id,
        organization_name: name.into(),
        contact_person: None,
        phone_number: None,
        website: None,
        created_at: epoch(),
    };
    store
        .create_organization_account(&owner, &profile)
        .await
        .unwrap();
    assert!(store.find_organization(profile.id).await.unwrap().is_some());
    (owner, profile)
}

/// Mission starting `starts_in` after the epoch and lasting `hours`.
pub fn mission_request(starts_in: Duration, hours: i64, organization_id: Option<Uuid>) -> CreateMissionRequest {
    let start = epoch() + starts_in;
    CreateMissionRequest {
        title: "Park cleanup".into(),
        description: "Pick up litter around the pond".into(),
        location: "Slottsparken, Malmö".into(),
        start_time: start,
        end_time: start + Duration::hours(hours),
        organization_id,
    }
}
