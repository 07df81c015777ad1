use actix_web::{web, HttpResponse};

use crate::{error::AppError, models::LoginRequest, state::AppState};

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.users.login(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
