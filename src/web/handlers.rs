use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::device;
use crate::error::Result;
use crate::state::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Trigger the key and return the OTP it typed as the response body.
///
/// Runs one synchronous acquisition; a concurrent request gets 409 from the
/// session lock rather than queueing behind the in-flight touch.
pub async fn fetch_otp(State(state): State<Arc<AppState>>) -> Result<String> {
    state.session.acquire().await
}

/// List key-capable input devices, flagging security key candidates
pub async fn list_devices() -> Json<Vec<device::DeviceInfo>> {
    Json(device::list_devices())
}
