//! Acquisition orchestration

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::locks::SessionLocks;
use crate::config::AppConfig;
use crate::device::DeviceBackend;
use crate::error::Result;
use crate::input::read_otp;
use crate::trigger::Trigger;

/// Lock key shared by all auto-detected acquisitions.
///
/// Locking happens before resolution, so a hintless session cannot key its
/// lock by device path yet; one process manages one physical key, so a single
/// shared key covers it.
const AUTO_LOCK_KEY: &str = "auto";

/// One full trigger-and-capture pipeline.
///
/// An acquisition runs lock, resolve, open, pulse, read, in that order. The
/// in-process lock is the authoritative busy signal; the exclusive device
/// grab underneath repels other processes as a second line of defense. The
/// lock guard and the device handle are dropped on every exit path.
pub struct OtpSession {
    hint: Option<String>,
    timeout: Duration,
    trigger: Arc<dyn Trigger>,
    devices: Arc<dyn DeviceBackend>,
    locks: SessionLocks,
}

impl OtpSession {
    pub fn new(
        config: &AppConfig,
        trigger: Arc<dyn Trigger>,
        devices: Arc<dyn DeviceBackend>,
    ) -> Self {
        Self {
            hint: config.reader.device.clone(),
            timeout: config.reader.timeout(),
            trigger,
            devices,
            locks: SessionLocks::new(),
        }
    }

    fn lock_key(&self) -> &str {
        self.hint.as_deref().unwrap_or(AUTO_LOCK_KEY)
    }

    /// Trigger the key once and capture the OTP it types.
    ///
    /// Fails fast with DeviceBusy if another session holds this device; a
    /// failed touch is not retried, the caller issues a new request instead.
    pub async fn acquire(&self) -> Result<String> {
        let _guard = self.locks.try_acquire(self.lock_key())?;

        let device = self.devices.resolve(self.hint.as_deref())?;
        debug!(path = %device.path.display(), name = %device.name, "resolved security key");

        // Grab before the pulse: an evdev client only sees events delivered
        // after it opens the device, and the grab keeps the OTP keystrokes
        // off the console. Nothing is consumed until the pulse completes.
        let mut source = self.devices.open(&device.path).await?;

        // The timeout window opens when the pulse begins, so a touch that is
        // slow to register counts against the same budget as the read.
        let deadline = Instant::now() + self.timeout;
        self.trigger.pulse().await?;

        let otp = read_otp(source.as_mut(), deadline, self.timeout).await?;
        if otp.is_empty() {
            warn!("security key terminated the line without typing an OTP");
        }
        info!(chars = otp.len(), "captured one-time password");
        Ok(otp)
    }
}
