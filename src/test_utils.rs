//! Shared test fakes for the trigger-and-capture pipeline

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;

use crate::device::{DeviceBackend, DeviceInfo};
use crate::error::{AppError, Result};
use crate::input::{KeyEvent, KeySource};
use crate::trigger::Trigger;

/// A key press event with the given scan code
pub fn press(code: u16) -> KeyEvent {
    KeyEvent {
        code,
        pressed: true,
        timestamp: SystemTime::UNIX_EPOCH,
    }
}

/// A key release event with the given scan code
pub fn release(code: u16) -> KeyEvent {
    KeyEvent {
        code,
        pressed: false,
        timestamp: SystemTime::UNIX_EPOCH,
    }
}

/// Key source that replays a fixed script, then pends forever.
///
/// Pending once the script is exhausted models a device that stops typing;
/// reads against it only finish through the deadline.
pub struct ScriptedSource {
    events: VecDeque<KeyEvent>,
    initial_delay: Duration,
}

impl ScriptedSource {
    pub fn new(events: Vec<KeyEvent>) -> Self {
        Self {
            events: events.into(),
            initial_delay: Duration::ZERO,
        }
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }
}

#[async_trait]
impl KeySource for ScriptedSource {
    async fn next_key(&mut self) -> Result<KeyEvent> {
        if !self.initial_delay.is_zero() {
            let delay = std::mem::replace(&mut self.initial_delay, Duration::ZERO);
            tokio::time::sleep(delay).await;
        }
        match self.events.pop_front() {
            Some(event) => Ok(event),
            None => std::future::pending().await,
        }
    }
}

/// Trigger that counts pulses without touching hardware
pub struct MockTrigger {
    pulses: AtomicU64,
    fail: bool,
}

impl MockTrigger {
    pub fn new() -> Self {
        Self {
            pulses: AtomicU64::new(0),
            fail: false,
        }
    }

    /// A trigger whose pulses fail like an unwired GPIO line
    pub fn failing() -> Self {
        Self {
            pulses: AtomicU64::new(0),
            fail: true,
        }
    }
}

#[async_trait]
impl Trigger for MockTrigger {
    async fn pulse(&self) -> Result<()> {
        if self.fail {
            return Err(AppError::Gpio("simulated trigger fault".to_string()));
        }
        self.pulses.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn pulse_count(&self) -> u64 {
        self.pulses.load(Ordering::Relaxed)
    }
}

/// Device backend producing scripted sources instead of real evdev handles
pub struct MockBackend {
    script: Vec<KeyEvent>,
    initial_delay: Duration,
    resolvable: bool,
}

impl MockBackend {
    pub fn new(script: Vec<KeyEvent>) -> Self {
        Self {
            script,
            initial_delay: Duration::ZERO,
            resolvable: true,
        }
    }

    /// Delay before the scripted device starts typing
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// A backend with no device plugged in
    pub fn unresolvable() -> Self {
        Self {
            script: Vec::new(),
            initial_delay: Duration::ZERO,
            resolvable: false,
        }
    }
}

#[async_trait]
impl DeviceBackend for MockBackend {
    fn resolve(&self, _hint: Option<&str>) -> Result<DeviceInfo> {
        if !self.resolvable {
            return Err(AppError::DeviceNotFound(
                "no input device matches a known security key signature".to_string(),
            ));
        }
        Ok(DeviceInfo {
            path: "/dev/input/event9".into(),
            name: "Yubico YubiKey OTP+FIDO+CCID".to_string(),
            security_key: true,
        })
    }

    async fn open(&self, _path: &Path) -> Result<Box<dyn KeySource>> {
        Ok(Box::new(
            ScriptedSource::new(self.script.clone()).with_initial_delay(self.initial_delay),
        ))
    }
}
