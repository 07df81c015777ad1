use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::{error::AppError, middleware::AuthUser, state::AppState};

/// GET /api/users/{id}/missions
pub async fn user_missions(
    state: web::Data<AppState>,
    _user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let missions = state.missions.missions_for_user(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(missions))
}
