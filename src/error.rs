use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("no security key detected: {0}")]
    DeviceNotFound(String),

    #[error("multiple security keys detected: {}", .0.join(", "))]
    DeviceAmbiguous(Vec<String>),

    #[error("device busy: {0}")]
    DeviceBusy(String),

    #[error("no OTP received within {0:.1}s")]
    Timeout(f64),

    #[error("Not authenticated")]
    Unauthorized,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("GPIO error: {0}")]
    Gpio(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // Server misconfiguration from the client's point of view
            Self::DeviceNotFound(_) | Self::DeviceAmbiguous(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // Another trigger session is in flight; do not queue behind it
            Self::DeviceBusy(_) => StatusCode::CONFLICT,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Config(_) | Self::Gpio(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Process exit code for the one-shot CLI mode.
    ///
    /// Distinct codes let scripts tell "someone else is using it" (busy) from
    /// "nothing is plugged in" (not found) from "no touch registered" (timeout).
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::DeviceNotFound(_) => 2,
            Self::DeviceAmbiguous(_) => 3,
            Self::DeviceBusy(_) => 4,
            Self::Timeout(_) => 5,
            Self::Unauthorized | Self::Config(_) | Self::Gpio(_) | Self::Io(_) => 1,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            success: false,
            message: self.to_string(),
        };

        tracing::error!(
            error_type = std::any::type_name_of_val(&self),
            error_message = %body.message,
            "Request failed"
        );

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_distinguish_outcomes() {
        assert_eq!(
            AppError::DeviceBusy("auto".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Timeout(3.0).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            AppError::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::DeviceNotFound("no candidates".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [
            AppError::Io(std::io::Error::other("x")).exit_code(),
            AppError::DeviceNotFound(String::new()).exit_code(),
            AppError::DeviceAmbiguous(vec![]).exit_code(),
            AppError::DeviceBusy(String::new()).exit_code(),
            AppError::Timeout(0.0).exit_code(),
        ];
        let mut deduped = codes.to_vec();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), codes.len());
        assert!(codes.iter().all(|c| *c != 0));
    }

    #[test]
    fn test_ambiguous_message_lists_candidates() {
        let err = AppError::DeviceAmbiguous(vec![
            "/dev/input/event3".into(),
            "/dev/input/event5".into(),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("/dev/input/event3"));
        assert!(msg.contains("/dev/input/event5"));
    }
}
