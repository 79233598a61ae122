use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::auth::token_auth;
use super::handlers;
use crate::state::AppState;

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new().route("/health", get(handlers::health_check));

    // Token-protected routes
    let protected_routes = Router::new()
        .route("/", get(handlers::fetch_otp))
        .route("/devices", get(handlers::list_devices))
        .route_layer(middleware::from_fn_with_state(state.clone(), token_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::input::keymap::KEY_ENTER;
    use crate::session::OtpSession;
    use crate::test_utils::{press, MockBackend, MockTrigger};
    use crate::trigger::Trigger;
    use crate::web::auth::AUTH_TOKEN_HEADER;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    fn yubi_script() -> Vec<crate::input::KeyEvent> {
        vec![press(21), press(22), press(48), press(23), press(KEY_ENTER)]
    }

    fn test_state(
        tokens: Vec<String>,
        backend: MockBackend,
    ) -> (Arc<AppState>, Arc<MockTrigger>) {
        let mut config = AppConfig::default();
        config.web.auth_tokens = tokens;
        config.reader.timeout_ms = 50;
        let trigger = Arc::new(MockTrigger::new());
        let session = OtpSession::new(&config, trigger.clone(), Arc::new(backend));
        (AppState::new(config, session), trigger)
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_token_is_rejected_before_any_pulse() {
        let (state, trigger) = test_state(vec!["secret".into()], MockBackend::new(yubi_script()));
        let router = create_router(state);

        let response = router
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(trigger.pulse_count(), 0);
    }

    #[tokio::test]
    async fn test_wrong_token_is_rejected() {
        let (state, trigger) = test_state(vec!["secret".into()], MockBackend::new(yubi_script()));
        let router = create_router(state);

        let response = router
            .oneshot(
                Request::get("/")
                    .header(AUTH_TOKEN_HEADER, "guess")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(trigger.pulse_count(), 0);
    }

    #[tokio::test]
    async fn test_valid_token_returns_otp_body() {
        let (state, trigger) = test_state(vec!["secret".into()], MockBackend::new(yubi_script()));
        let router = create_router(state);

        let response = router
            .oneshot(
                Request::get("/")
                    .header(AUTH_TOKEN_HEADER, "secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "yubi");
        assert_eq!(trigger.pulse_count(), 1);
    }

    #[tokio::test]
    async fn test_disabled_auth_serves_without_token() {
        let (state, _trigger) = test_state(vec![], MockBackend::new(yubi_script()));
        let router = create_router(state);

        let response = router
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "yubi");
    }

    #[tokio::test]
    async fn test_silent_device_maps_to_gateway_timeout() {
        let (state, _trigger) = test_state(vec![], MockBackend::new(vec![]));
        let router = create_router(state);

        let response = router
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_missing_device_maps_to_server_error() {
        let (state, _trigger) = test_state(vec![], MockBackend::unresolvable());
        let router = create_router(state);

        let response = router
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let (state, _trigger) = test_state(vec!["secret".into()], MockBackend::new(vec![]));
        let router = create_router(state);

        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
