//! Application configuration
//!
//! Plain serde structs with per-section defaults, optionally loaded from a
//! JSON file. Command line flags override file values in `main`.

mod schema;

pub use schema::{AppConfig, ReaderConfig, WebConfig};

use std::path::Path;

use crate::error::{AppError, Result};

impl AppConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| AppError::Config(format!("cannot parse {}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_round_trips_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&AppConfig::default()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = AppConfig::load(file.path()).unwrap();
        assert_eq!(loaded.reader, ReaderConfig::default());
        assert_eq!(loaded.web, WebConfig::default());
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = AppConfig::load(Path::new("/nonexistent/touchkey.json")).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
