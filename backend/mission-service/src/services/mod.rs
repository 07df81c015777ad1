pub mod missions;
pub mod organizations;
pub mod users;

pub use missions::MissionService;
pub use organizations::OrganizationService;
pub use users::UserService;
