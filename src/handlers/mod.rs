use axum::response::Response;
use serde::Serialize;

use crate::utils::response::success;

pub mod attendance;
pub mod auth;
pub mod blog;
pub mod events;
pub mod session;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "tunewave-api",
    };

    success(payload, "Health check successful")
}
