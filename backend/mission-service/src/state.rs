use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    clock::Clock,
    config::Config,
    repository::{
        AssignmentRepository, MissionRepository, OrganizationRepository, Repositories,
        UserRepository,
    },
    services::{MissionService, OrganizationService, UserService},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub missions: MissionService,
    pub organizations: OrganizationService,
    pub users: UserService,
    /// Present for the PostgreSQL backend; used by the readiness probe
    pub db: Option<PgPool>,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, clock: Arc<dyn Clock>, config: Config, db: Option<PgPool>) -> Self
    where
        S: UserRepository
            + OrganizationRepository
            + MissionRepository
            + AssignmentRepository
            + 'static,
    {
        let repos = Repositories::from_store(store);
        Self {
            config: Arc::new(config),
            missions: MissionService::new(repos.clone(), clock.clone()),
            organizations: OrganizationService::new(repos.clone(), clock.clone()),
            users: UserService::new(repos, clock),
            db,
        }
    }
}
