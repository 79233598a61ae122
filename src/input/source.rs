//! Key event sources

use async_trait::async_trait;
use evdev::{Device, InputEventKind};
use std::path::Path;
use std::time::SystemTime;
use tracing::debug;

use crate::error::{AppError, Result};

/// An atomic unit read from a device stream
#[derive(Debug, Clone, Copy)]
pub struct KeyEvent {
    /// Keyboard scan code
    pub code: u16,
    /// True for a press, false for release or auto-repeat
    pub pressed: bool,
    /// Kernel timestamp of the event
    pub timestamp: SystemTime,
}

/// A stream of key events from one input device.
///
/// Dropping a source closes the device handle and releases any grab, which
/// also aborts a pending read.
#[async_trait]
pub trait KeySource: Send {
    /// Next key event from the device. Pends until one arrives.
    async fn next_key(&mut self) -> Result<KeyEvent>;
}

/// Key events read from an evdev device grabbed for exclusive access
pub struct EvdevKeySource {
    stream: evdev::EventStream,
}

impl EvdevKeySource {
    /// Open and grab the device.
    ///
    /// The grab keeps the OTP keystrokes from reaching the console and
    /// doubles as a cross-process exclusivity check: a device grabbed by
    /// another process reports EBUSY.
    pub fn open(path: &Path) -> Result<Self> {
        let mut device = Device::open(path)?;
        device.grab().map_err(|e| {
            if e.raw_os_error() == Some(libc::EBUSY) {
                AppError::DeviceBusy(format!(
                    "{} is grabbed by another process",
                    path.display()
                ))
            } else {
                AppError::Io(e)
            }
        })?;
        debug!(path = %path.display(), "input device grabbed");
        let stream = device.into_event_stream()?;
        Ok(Self { stream })
    }
}

#[async_trait]
impl KeySource for EvdevKeySource {
    async fn next_key(&mut self) -> Result<KeyEvent> {
        loop {
            let event = self.stream.next_event().await?;
            if let InputEventKind::Key(key) = event.kind() {
                return Ok(KeyEvent {
                    code: key.code(),
                    pressed: event.value() == 1,
                    timestamp: event.timestamp(),
                });
            }
            // Synchronization and misc events are not key data
        }
    }
}
