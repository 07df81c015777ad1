use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::state::AppState;

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Ready once the database answers; the in-memory backend is always ready.
pub async fn ready(state: web::Data<AppState>) -> HttpResponse {
    let Some(pool) = state.db.as_ref() else {
        return HttpResponse::Ok().json(json!({ "status": "ready", "storage": "memory" }));
    };

    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => HttpResponse::Ok().json(json!({ "status": "ready", "storage": "postgres" })),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            HttpResponse::ServiceUnavailable().json(json!({ "status": "unavailable" }))
        }
    }
}
