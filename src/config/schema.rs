use serde::{Deserialize, Serialize};

use crate::trigger::TriggerConfig;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Touch trigger circuit settings
    pub trigger: TriggerConfig,
    /// OTP capture settings
    pub reader: ReaderConfig,
    /// Web server settings
    pub web: WebConfig,
}

/// OTP capture configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReaderConfig {
    /// Input device path of the security key (e.g. /dev/input/event3).
    /// When unset the key is auto-detected by device name.
    pub device: Option<String>,
    /// Read timeout in milliseconds, counted from the moment the
    /// trigger pulse begins
    pub timeout_ms: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            device: None,
            timeout_ms: 3000,
        }
    }
}

impl ReaderConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }
}

/// Web server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WebConfig {
    /// Listen address
    pub bind_address: String,
    /// HTTP port
    pub port: u16,
    /// Accepted X-Auth-Token values. Empty disables token authentication.
    pub auth_tokens: Vec<String>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8840,
            auth_tokens: Vec::new(),
        }
    }
}

impl WebConfig {
    /// Whether token authentication is enabled
    pub fn auth_enabled(&self) -> bool {
        !self.auth_tokens.is_empty()
    }
}
