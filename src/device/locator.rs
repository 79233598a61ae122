//! Security key discovery
//!
//! A security key exposes its OTP function as an ordinary USB keyboard, so the
//! target has to be picked out of /dev/input/event* by name. Resolution is
//! read-only: devices are opened only to query their name and capabilities,
//! never grabbed.

use evdev::{Device, EventType};
use std::path::PathBuf;

use super::types::DeviceInfo;
use crate::error::{AppError, Result};

/// A device name signature identifying a security key's OTP keyboard interface
struct Signature {
    prefix: &'static str,
    token: &'static str,
}

/// Known vendor/product name patterns.
///
/// YubiKeys report e.g. "Yubico YubiKey OTP+FIDO+CCID"; older firmware
/// capitalizes the model name differently.
const SIGNATURES: &[Signature] = &[
    Signature {
        prefix: "Yubico YubiKey",
        token: "OTP",
    },
    Signature {
        prefix: "Yubico Yubikey",
        token: "OTP",
    },
];

/// Whether a device name looks like a security key's OTP keyboard
pub fn matches_signature(name: &str) -> bool {
    SIGNATURES
        .iter()
        .any(|sig| name.starts_with(sig.prefix) && name.contains(sig.token))
}

/// List all key-capable input devices on the system
pub fn list_devices() -> Vec<DeviceInfo> {
    let mut devices: Vec<DeviceInfo> = evdev::enumerate()
        .filter_map(|(path, device)| {
            if !device.supported_events().contains(EventType::KEY) {
                return None;
            }
            let name = device.name().unwrap_or("unknown").to_string();
            Some(DeviceInfo {
                security_key: matches_signature(&name),
                path,
                name,
            })
        })
        .collect();

    devices.sort_by(|a, b| a.path.cmp(&b.path));
    devices
}

/// Pick the target out of the signature-matching candidates
fn select_candidate(mut candidates: Vec<DeviceInfo>) -> Result<DeviceInfo> {
    match candidates.len() {
        0 => Err(AppError::DeviceNotFound(
            "no input device matches a known security key signature".to_string(),
        )),
        1 => Ok(candidates.remove(0)),
        _ => Err(AppError::DeviceAmbiguous(
            candidates
                .iter()
                .map(|d| d.path.display().to_string())
                .collect(),
        )),
    }
}

/// Resolve the target device from an explicit path or by auto-detection
pub fn resolve(hint: Option<&str>) -> Result<DeviceInfo> {
    match hint {
        Some(path) => {
            let device = Device::open(path)
                .map_err(|e| AppError::DeviceNotFound(format!("{}: {}", path, e)))?;
            if !device.supported_events().contains(EventType::KEY) {
                return Err(AppError::DeviceNotFound(format!(
                    "{} does not emit key events",
                    path
                )));
            }
            let name = device.name().unwrap_or("unknown").to_string();
            Ok(DeviceInfo {
                security_key: matches_signature(&name),
                path: PathBuf::from(path),
                name,
            })
        }
        None => select_candidate(
            list_devices()
                .into_iter()
                .filter(|d| d.security_key)
                .collect(),
        ),
    }
}
