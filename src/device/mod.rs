//! Security key input device handling
//!
//! Locates the key's OTP keyboard interface among the system's input devices,
//! either from an explicit path or by matching device names against known
//! security key signatures, and opens it for exclusive capture.

mod backend;
mod locator;
mod types;

pub use backend::{DeviceBackend, EvdevBackend};
pub use locator::{list_devices, matches_signature, resolve};
pub use types::DeviceInfo;
