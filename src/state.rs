use std::sync::Arc;

use crate::config::AppConfig;
use crate::session::OtpSession;

/// Application-wide state shared across handlers
pub struct AppState {
    /// Effective configuration (file merged with CLI overrides)
    pub config: AppConfig,
    /// The single trigger-and-capture pipeline
    pub session: OtpSession,
}

impl AppState {
    pub fn new(config: AppConfig, session: OtpSession) -> Arc<Self> {
        Arc::new(Self { config, session })
    }
}
