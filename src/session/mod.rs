//! Trigger-and-capture sessions
//!
//! One session takes the per-device lock, resolves the key, pulses the
//! trigger circuit, and reads the OTP with a deadline. Concurrent callers
//! are rejected immediately with DeviceBusy; the physical key can only
//! serve one touch at a time.

mod controller;
mod locks;

pub use controller::OtpSession;
pub use locks::{SessionGuard, SessionLocks};
