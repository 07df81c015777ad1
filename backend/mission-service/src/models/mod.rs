//! Domain entities and request/response DTOs.

pub mod assignment;
pub mod mission;
pub mod organization;
pub mod user;

pub use assignment::{AssignRequest, AssignResult, AssignedMission, AssignedVolunteer, MissionAssignment};
pub use mission::{CreateMissionRequest, Mission, MissionStatus, MissionView, StatusQuery};
pub use organization::{
    CreateOrganizationRequest, MemberView, OrganizationProfile, OWNER_MEMBER_ROLE,
};
pub use user::{
    AuthResponse, LoginRequest, LoginResponse, RegisterOrganizationRequest,
    RegisterVolunteerRequest, User, UserRole,
};
