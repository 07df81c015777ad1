//! HTTP handlers and route table

pub mod auth;
pub mod health;
pub mod missions;
pub mod organizations;
pub mod register;
pub mod users;

use actix_middleware::JwtAuthMiddleware;
use actix_web::{
    error::{JsonPayloadError, PathError},
    web, HttpRequest,
};

use crate::error::AppError;
use crate::metrics::serve_metrics;

/// Malformed JSON bodies get the same error envelope as everything else.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
            AppError::BadRequest(err.to_string()).into()
        })
}

/// Path segments that fail to parse (e.g. a non-UUID id) are a 400, not a bare 404.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, _req: &HttpRequest| {
        AppError::BadRequest(err.to_string()).into()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health))
        .route("/ready", web::get().to(health::ready))
        .route("/metrics", web::get().to(serve_metrics))
        .service(web::scope("/api/auth").route("/login", web::post().to(auth::login)))
        .service(
            web::scope("/api/register")
                .route("/volunteer", web::post().to(register::register_volunteer))
                .route("/organization", web::post().to(register::register_organization)),
        )
        .service(
            web::scope("/api")
                .wrap(JwtAuthMiddleware)
                .service(
                    web::scope("/missions")
                        .route("", web::get().to(missions::list_missions))
                        .route("", web::post().to(missions::create_mission))
                        .route("/my", web::get().to(missions::my_missions))
                        .route("/{id}", web::get().to(missions::get_mission))
                        .route("/{id}/assign", web::post().to(missions::assign))
                        .route("/{id}/assignments", web::get().to(missions::list_assignments)),
                )
                .service(
                    web::scope("/organizations")
                        .route("", web::get().to(organizations::list_organizations))
                        .route("", web::post().to(organizations::create_organization))
                        .route("/{id}", web::get().to(organizations::get_organization))
                        .route("/{id}/missions", web::get().to(organizations::organization_missions))
                        .route("/{id}/members", web::get().to(organizations::organization_members)),
                )
                .service(
                    web::scope("/users").route("/{id}/missions", web::get().to(users::user_missions)),
                ),
        );
}
