//! Touch trigger
//!
//! Drives the GPIO line wired to the security key's capacitive touch sensor.
//! A pulse closes the sensor's grounding path through a transistor for a
//! configured duration, which the key registers as a finger touch.
//!
//! The line must never be left at the active level: a stuck-active line keeps
//! loading the sensor and the key stops registering touches. Every exit path
//! of [`GpioTrigger::pulse`] restores the inactive level, including mid-pulse
//! errors and cancellation of the in-flight future.

mod types;

pub use types::{ActiveLevel, TriggerConfig};

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use gpio_cdev::{Chip, LineHandle, LineRequestFlags};
use parking_lot::Mutex;
use tokio::time::sleep;
use tracing::debug;

use crate::error::{AppError, Result};

/// Consumer label shown in gpioinfo for the requested line
const LINE_CONSUMER: &str = "touchkey-trigger";

/// Something that can emulate a touch on the sensor
#[async_trait]
pub trait Trigger: Send + Sync {
    /// Issue one touch pulse
    async fn pulse(&self) -> Result<()>;

    /// Number of pulses issued over the process lifetime
    fn pulse_count(&self) -> u64;
}

/// Output line abstraction so pulse behavior is testable without hardware
trait OutputLine: Send {
    fn set_active(&mut self) -> Result<()>;
    fn set_inactive(&mut self) -> Result<()>;
}

/// GPIO character device backed line
struct CdevLine {
    handle: LineHandle,
    active: u8,
    inactive: u8,
}

impl CdevLine {
    fn set(&self, value: u8) -> Result<()> {
        self.handle
            .set_value(value)
            .map_err(|e| AppError::Gpio(format!("GPIO set failed: {}", e)))
    }
}

impl OutputLine for CdevLine {
    fn set_active(&mut self) -> Result<()> {
        self.set(self.active)
    }

    fn set_inactive(&mut self) -> Result<()> {
        self.set(self.inactive)
    }
}

/// Trigger backed by a GPIO output line
pub struct GpioTrigger {
    config: TriggerConfig,
    line: Mutex<Option<Box<dyn OutputLine>>>,
    pulses: AtomicU64,
}

impl GpioTrigger {
    /// Create an uninitialized trigger with the given configuration
    pub fn new(config: TriggerConfig) -> Self {
        Self {
            config,
            line: Mutex::new(None),
            pulses: AtomicU64::new(0),
        }
    }

    /// Request the line from the GPIO character device.
    ///
    /// The line starts at the inactive level. Failures here are wiring or
    /// permission problems and are not retried.
    pub fn init(&self) -> Result<()> {
        let mut chip = Chip::new(&self.config.chip)
            .map_err(|e| AppError::Gpio(format!("GPIO chip open failed: {}", e)))?;

        let line = chip.get_line(self.config.pin).map_err(|e| {
            AppError::Gpio(format!("GPIO line {} failed: {}", self.config.pin, e))
        })?;

        // Initial value depends on active level (start in inactive state)
        let (active, inactive) = match self.config.active_level {
            ActiveLevel::High => (1, 0),
            ActiveLevel::Low => (0, 1),
        };

        let handle = line
            .request(LineRequestFlags::OUTPUT, inactive, LINE_CONSUMER)
            .map_err(|e| AppError::Gpio(format!("GPIO request failed: {}", e)))?;

        *self.line.lock() = Some(Box::new(CdevLine {
            handle,
            active,
            inactive,
        }));
        debug!(pin = self.config.pin, "GPIO trigger line configured");
        Ok(())
    }

    #[cfg(test)]
    fn with_line(config: TriggerConfig, line: Box<dyn OutputLine>) -> Self {
        Self {
            config,
            line: Mutex::new(Some(line)),
            pulses: AtomicU64::new(0),
        }
    }

    fn set_level(&self, active: bool) -> Result<()> {
        let mut guard = self.line.lock();
        let line = guard
            .as_mut()
            .ok_or_else(|| AppError::Gpio("trigger line not initialized".to_string()))?;
        if active {
            line.set_active()
        } else {
            line.set_inactive()
        }
    }

    fn pulse_width(&self) -> Duration {
        self.config.pulse_duration()
    }
}

/// Restores the inactive level when the pulse future is dropped mid-sleep
struct ReleaseGuard<'a> {
    trigger: &'a GpioTrigger,
    armed: bool,
}

impl<'a> ReleaseGuard<'a> {
    fn release(mut self) -> Result<()> {
        self.armed = false;
        self.trigger.set_level(false)
    }
}

impl Drop for ReleaseGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let _ = self.trigger.set_level(false);
        }
    }
}

#[async_trait]
impl Trigger for GpioTrigger {
    async fn pulse(&self) -> Result<()> {
        self.pulses.fetch_add(1, Ordering::Relaxed);
        debug!(
            pin = self.config.pin,
            width_ms = self.config.pulse_ms,
            "pulsing touch trigger"
        );

        self.set_level(true)?;
        let guard = ReleaseGuard {
            trigger: self,
            armed: true,
        };

        // Lock is not held across the sleep
        sleep(self.pulse_width()).await;

        guard.release()
    }

    fn pulse_count(&self) -> u64 {
        self.pulses.load(Ordering::Relaxed)
    }
}
