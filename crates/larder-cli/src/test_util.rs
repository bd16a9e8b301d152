//! Helpers for tests that touch process-wide environment variables.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serialize tests that read or write environment variables.
pub fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct RestoreVar {
    key: &'static str,
    previous: Option<String>,
}

impl Drop for RestoreVar {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => unsafe { std::env::set_var(self.key, value) },
            None => unsafe { std::env::remove_var(self.key) },
        }
    }
}

/// Run `f` with `XDG_CONFIG_HOME` pointing at `dir`. Callers must hold
/// [`lock_env`].
pub fn with_config_home<T>(dir: &Path, f: impl FnOnce() -> T) -> T {
    let _restore = RestoreVar {
        key: "XDG_CONFIG_HOME",
        previous: std::env::var("XDG_CONFIG_HOME").ok(),
    };
    unsafe { std::env::set_var("XDG_CONFIG_HOME", dir) };
    f()
}
