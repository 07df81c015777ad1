//! Mission endpoints. All require a bearer token.

use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    middleware::AuthUser,
    models::{AssignRequest, AssignResult, CreateMissionRequest, MissionStatus, StatusQuery},
    state::AppState,
};

pub(crate) fn status_filter(query: &StatusQuery) -> Result<Option<MissionStatus>, AppError> {
    query.parse().map_err(AppError::BadRequest)
}

/// GET /api/missions?status=
pub async fn list_missions(
    state: web::Data<AppState>,
    _user: AuthUser,
    query: web::Query<StatusQuery>,
) -> Result<HttpResponse, AppError> {
    let status = status_filter(&query)?;
    let missions = state.missions.list_missions(status).await?;
    Ok(HttpResponse::Ok().json(missions))
}

/// POST /api/missions
pub async fn create_mission(
    state: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<CreateMissionRequest>,
) -> Result<HttpResponse, AppError> {
    let id = state.missions.create_mission(body.into_inner(), user.id).await?;
    Ok(HttpResponse::Created().json(json!({ "id": id })))
}

/// GET /api/missions/my?status=
pub async fn my_missions(
    state: web::Data<AppState>,
    user: AuthUser,
    query: web::Query<StatusQuery>,
) -> Result<HttpResponse, AppError> {
    let status = status_filter(&query)?;
    let missions = state.missions.missions_for_creator(user.id, status).await?;
    Ok(HttpResponse::Ok().json(missions))
}

/// GET /api/missions/{id}
pub async fn get_mission(
    state: web::Data<AppState>,
    _user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let mission = state.missions.get_mission(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(mission))
}

/// POST /api/missions/{id}/assign
///
/// The body is optional; an empty request signs up without a role description.
pub async fn assign(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
    body: Option<web::Json<AssignRequest>>,
) -> Result<HttpResponse, AppError> {
    user.require_volunteer()?;
    let mission_id = path.into_inner();
    let req = body.map(|b| b.into_inner()).unwrap_or_default();
    req.validate()?;

    match state
        .missions
        .assign(mission_id, user.id, req.role_description)
        .await?
    {
        AssignResult::Success => Ok(HttpResponse::Ok().json(json!({
            "result": AssignResult::Success,
            "missionId": mission_id,
            "userId": user.id,
        }))),
        AssignResult::AlreadyAssigned => Err(AppError::AlreadyAssigned),
        AssignResult::MissionNotFound => Err(AppError::MissionNotFound(mission_id)),
        AssignResult::VolunteerNotFound => Err(AppError::UserNotFound(user.id)),
        AssignResult::Error => Err(AppError::Internal(
            "Failed to store assignment".to_string(),
        )),
    }
}

/// GET /api/missions/{id}/assignments
pub async fn list_assignments(
    state: web::Data<AppState>,
    _user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let volunteers = state.missions.volunteers_for_mission(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(volunteers))
}
