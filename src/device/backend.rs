//! Device backend trait definition

use async_trait::async_trait;
use std::path::Path;

use super::locator;
use super::types::DeviceInfo;
use crate::error::Result;
use crate::input::{EvdevKeySource, KeySource};

/// Backend over the physical input device: resolution plus exclusive open.
///
/// The session orchestrator only talks to this trait, so acquisitions can be
/// exercised end to end against scripted devices.
#[async_trait]
pub trait DeviceBackend: Send + Sync {
    /// Resolve the target device from an explicit path or by auto-detection.
    /// Read-only; the device is not grabbed.
    fn resolve(&self, hint: Option<&str>) -> Result<DeviceInfo>;

    /// Open the device for exclusive reading
    async fn open(&self, path: &Path) -> Result<Box<dyn KeySource>>;
}

/// evdev-backed devices under /dev/input
pub struct EvdevBackend;

#[async_trait]
impl DeviceBackend for EvdevBackend {
    fn resolve(&self, hint: Option<&str>) -> Result<DeviceInfo> {
        locator::resolve(hint)
    }

    async fn open(&self, path: &Path) -> Result<Box<dyn KeySource>> {
        Ok(Box::new(EvdevKeySource::open(path)?))
    }
}
