//! Per-device session locks

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

use crate::error::{AppError, Result};

/// Guard held for the duration of one acquisition; releases on drop
pub type SessionGuard = OwnedMutexGuard<()>;

/// Process-wide registry of per-device try-locks.
///
/// One lock identity per device key, created lazily and reused for the
/// process lifetime. A trigger-and-capture session runs on a human timescale,
/// so contention is rejected immediately instead of queued: a caller should
/// never sit behind another in-flight touch.
pub struct SessionLocks {
    inner: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Non-blocking try-acquire of the lock for `key`
    pub fn try_acquire(&self, key: &str) -> Result<SessionGuard> {
        let slot = {
            let mut map = self.inner.lock();
            map.entry(key.to_string()).or_default().clone()
        };

        slot.try_lock_owned().map_err(|_| {
            AppError::DeviceBusy(format!("another trigger session is active on {}", key))
        })
    }
}

impl Default for SessionLocks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_immediately() {
        let locks = SessionLocks::new();
        let _guard = locks.try_acquire("auto").unwrap();
        let err = locks.try_acquire("auto").unwrap_err();
        assert!(matches!(err, AppError::DeviceBusy(_)));
    }

    #[test]
    fn test_release_makes_key_acquirable_again() {
        let locks = SessionLocks::new();
        let guard = locks.try_acquire("auto").unwrap();
        drop(guard);
        assert!(locks.try_acquire("auto").is_ok());
    }

    #[test]
    fn test_distinct_keys_do_not_contend() {
        let locks = SessionLocks::new();
        let _a = locks.try_acquire("/dev/input/event3").unwrap();
        assert!(locks.try_acquire("/dev/input/event5").is_ok());
    }
}
