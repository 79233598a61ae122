use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the caller's access token
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Token authentication middleware.
///
/// Rejects before any session work starts, so an unauthenticated request can
/// never pulse the trigger. With no tokens configured authentication is
/// disabled (the server logs a warning at startup).
pub async fn token_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.web.auth_enabled() {
        return next.run(request).await;
    }

    let presented = request
        .headers()
        .get(AUTH_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());

    match presented {
        Some(token) if state.config.web.auth_tokens.iter().any(|t| t == token) => {
            next.run(request).await
        }
        _ => AppError::Unauthorized.into_response(),
    }
}
