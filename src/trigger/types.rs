//! Trigger configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Active level for the trigger line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveLevel {
    /// Active high (default for most cases)
    High,
    /// Active low (inverted)
    Low,
}

impl Default for ActiveLevel {
    fn default() -> Self {
        Self::High
    }
}

/// Touch trigger circuit configuration
///
/// The line drives a transistor that closes the security key's touch sensor
/// grounding path, emulating a finger press.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TriggerConfig {
    /// GPIO character device (e.g. /dev/gpiochip0)
    pub chip: String,
    /// GPIO line offset connected to the trigger circuit
    pub pin: u32,
    /// Level that closes the circuit
    pub active_level: ActiveLevel,
    /// Pulse width in milliseconds. Long enough to register as a touch,
    /// short enough not to over-drive the transistor's residual capacitance.
    pub pulse_ms: u64,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            chip: "/dev/gpiochip0".to_string(),
            pin: 21,
            active_level: ActiveLevel::High,
            pulse_ms: 500,
        }
    }
}

impl TriggerConfig {
    pub fn pulse_duration(&self) -> Duration {
        Duration::from_millis(self.pulse_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_level_default() {
        assert_eq!(ActiveLevel::default(), ActiveLevel::High);
    }

    #[test]
    fn test_trigger_config_default() {
        let config = TriggerConfig::default();
        assert_eq!(config.chip, "/dev/gpiochip0");
        assert_eq!(config.pin, 21);
        assert_eq!(config.pulse_duration(), Duration::from_millis(500));
    }

    #[test]
    fn test_config_deserializes_with_partial_fields() {
        let config: TriggerConfig =
            serde_json::from_str(r#"{"pin": 5, "active_level": "low"}"#).unwrap();
        assert_eq!(config.pin, 5);
        assert_eq!(config.active_level, ActiveLevel::Low);
        assert_eq!(config.pulse_ms, 500);
    }
}
