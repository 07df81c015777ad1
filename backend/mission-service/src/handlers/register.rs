use actix_web::{web, HttpResponse};

use crate::{
    error::AppError,
    models::{RegisterOrganizationRequest, RegisterVolunteerRequest},
    state::AppState,
};

/// POST /api/register/volunteer
pub async fn register_volunteer(
    state: web::Data<AppState>,
    body: web::Json<RegisterVolunteerRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.users.register_volunteer(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

/// POST /api/register/organization
pub async fn register_organization(
    state: web::Data<AppState>,
    body: web::Json<RegisterOrganizationRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.users.register_organization(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}
