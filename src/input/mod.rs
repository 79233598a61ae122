//! OTP capture from the security key's keyboard interface
//!
//! The key types its OTP as ordinary keystrokes. This module grabs the input
//! device, filters the raw event stream down to key presses, and decodes them
//! through a fixed scan code table until the terminating Enter.

pub mod keymap;
mod reader;
mod source;

pub use reader::read_otp;
pub use source::{EvdevKeySource, KeyEvent, KeySource};
