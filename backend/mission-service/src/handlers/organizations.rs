use actix_web::{web, HttpResponse};
use uuid::Uuid;

use super::missions::status_filter;
use crate::{
    error::AppError,
    middleware::AuthUser,
    models::{CreateOrganizationRequest, StatusQuery},
    state::AppState,
};

/// GET /api/organizations
pub async fn list_organizations(
    state: web::Data<AppState>,
    _user: AuthUser,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.organizations.list().await?))
}

/// POST /api/organizations
pub async fn create_organization(
    state: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<CreateOrganizationRequest>,
) -> Result<HttpResponse, AppError> {
    let profile = state
        .organizations
        .create(user.id, body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(profile))
}

/// GET /api/organizations/{id}
pub async fn get_organization(
    state: web::Data<AppState>,
    _user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.organizations.get(path.into_inner()).await?))
}

/// GET /api/organizations/{id}/missions?status=
pub async fn organization_missions(
    state: web::Data<AppState>,
    _user: AuthUser,
    path: web::Path<Uuid>,
    query: web::Query<StatusQuery>,
) -> Result<HttpResponse, AppError> {
    let status = status_filter(&query)?;
    let missions = state
        .missions
        .missions_for_organization(path.into_inner(), status)
        .await?;
    Ok(HttpResponse::Ok().json(missions))
}

/// GET /api/organizations/{id}/members
pub async fn organization_members(
    state: web::Data<AppState>,
    _user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.organizations.members(path.into_inner()).await?))
}
