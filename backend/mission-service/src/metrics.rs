//! Prometheus counters for mission-service, served at `/metrics`.

use actix_web::HttpResponse;
use prometheus::{
    register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec,
    TextEncoder,
};

use crate::models::{AssignResult, UserRole};

lazy_static::lazy_static! {
    static ref MISSIONS_CREATED_TOTAL: IntCounter = register_int_counter!(
        "missions_created_total",
        "Missions created"
    ).expect("Prometheus metrics registration should succeed at startup");

    static ref MISSION_ASSIGNMENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "mission_assignments_total",
        "Sign-up attempts by outcome",
        &["result"]
    ).expect("Prometheus metrics registration should succeed at startup");

    static ref REGISTRATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "registrations_total",
        "Accounts registered by role",
        &["role"]
    ).expect("Prometheus metrics registration should succeed at startup");

    static ref LOGIN_ATTEMPTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "login_attempts_total",
        "Login attempts by outcome",
        &["outcome"]
    ).expect("Prometheus metrics registration should succeed at startup");
}

pub fn record_mission_created() {
    MISSIONS_CREATED_TOTAL.inc();
}

pub fn record_assignment(result: AssignResult) {
    MISSION_ASSIGNMENTS_TOTAL
        .with_label_values(&[result.as_str()])
        .inc();
}

pub fn record_registration(role: UserRole) {
    REGISTRATIONS_TOTAL.with_label_values(&[role.as_str()]).inc();
}

pub fn record_login(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    LOGIN_ATTEMPTS_TOTAL.with_label_values(&[outcome]).inc();
}

pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
