//! OTP decode loop

use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tracing::trace;

use super::keymap;
use super::source::KeySource;
use crate::error::{AppError, Result};

/// Read one OTP line from the device.
///
/// Consumes press events only, mapping each scan code through the keymap and
/// accumulating characters until Enter, which terminates the line and is not
/// included. The whole read is bounded by `deadline`; `budget` is the total
/// session timeout the deadline was derived from, reported on expiry.
///
/// Unmapped scan codes are dropped: a security key only ever types its own
/// alphabet, and stray codes must not corrupt the OTP.
pub async fn read_otp(
    source: &mut dyn KeySource,
    deadline: Instant,
    budget: Duration,
) -> Result<String> {
    let mut otp = String::new();

    loop {
        let event = match timeout_at(deadline, source.next_key()).await {
            Ok(event) => event?,
            Err(_) => return Err(AppError::Timeout(budget.as_secs_f64())),
        };

        if !event.pressed {
            continue;
        }

        if event.code == keymap::KEY_ENTER {
            return Ok(otp);
        }

        match keymap::scancode_to_char(event.code) {
            Some(ch) => otp.push(ch),
            None => trace!(code = event.code, "dropping unmapped scan code"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{press, release, ScriptedSource};

    fn deadline_in(secs: u64) -> Instant {
        Instant::now() + Duration::from_secs(secs)
    }

    #[tokio::test(start_paused = true)]
    async fn test_decodes_chars_until_enter() {
        // c c c c Enter
        let mut source = ScriptedSource::new(vec![
            press(46),
            press(46),
            press(46),
            press(46),
            press(keymap::KEY_ENTER),
        ]);
        let otp = read_otp(&mut source, deadline_in(3), Duration::from_secs(3))
            .await
            .unwrap();
        assert_eq!(otp, "cccc");
    }

    #[tokio::test(start_paused = true)]
    async fn test_ignores_release_events() {
        let mut source = ScriptedSource::new(vec![
            press(21),
            release(21),
            press(22),
            release(22),
            press(keymap::KEY_ENTER),
        ]);
        let otp = read_otp(&mut source, deadline_in(3), Duration::from_secs(3))
            .await
            .unwrap();
        assert_eq!(otp, "yu");
    }

    #[tokio::test(start_paused = true)]
    async fn test_drops_unmapped_codes() {
        // Left shift (42) and an out-of-range code interleaved with letters
        let mut source = ScriptedSource::new(vec![
            press(42),
            press(46),
            press(999),
            press(48),
            press(keymap::KEY_ENTER),
        ]);
        let otp = read_otp(&mut source, deadline_in(3), Duration::from_secs(3))
            .await
            .unwrap();
        assert_eq!(otp, "cb");
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_alone_yields_empty_otp() {
        let mut source = ScriptedSource::new(vec![press(keymap::KEY_ENTER)]);
        let otp = read_otp(&mut source, deadline_in(3), Duration::from_secs(3))
            .await
            .unwrap();
        assert_eq!(otp, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_without_enter() {
        // Characters arrive but the line never terminates
        let mut source = ScriptedSource::new(vec![press(46), press(46)]);
        let err = read_otp(&mut source, deadline_in(3), Duration::from_secs(3))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Timeout(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_with_silent_device() {
        let mut source = ScriptedSource::new(vec![]);
        let err = read_otp(&mut source, deadline_in(5), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Timeout(_)));
    }
}
