//! Input device data types

use serde::Serialize;
use std::path::PathBuf;

/// A key-capable input device discovered on the system
#[derive(Debug, Clone, Serialize)]
pub struct DeviceInfo {
    /// Device node path (e.g. /dev/input/event3)
    pub path: PathBuf,
    /// Device name as reported by the kernel
    pub name: String,
    /// Whether the name matches a known security key signature
    pub security_key: bool,
}
