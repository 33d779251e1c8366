//! Scoped environment overrides for tests that exercise [`crate::ComposerConfig::from_env`].

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

/// Serialize environment mutation across test threads.
///
/// A poisoned lock is recovered since the guarded state is the environment itself.
pub fn env_lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

#[allow(unused_unsafe)]
fn write_var(key: &str, value: Option<&str>) {
    // SAFETY: callers hold `env_lock` while tests mutate the environment.
    unsafe {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
}

/// Overrides one variable and puts the old value back on drop.
#[derive(Debug)]
pub struct EnvGuard {
    key: String,
    previous: Option<String>,
}

impl EnvGuard {
    /// Set `key` to `value` for the guard's lifetime.
    pub fn set(key: &str, value: &str) -> Self {
        Self::replace(key, Some(value))
    }

    /// Unset `key` for the guard's lifetime.
    pub fn remove(key: &str) -> Self {
        Self::replace(key, None)
    }

    fn replace(key: &str, value: Option<&str>) -> Self {
        let previous = std::env::var(key).ok();
        write_var(key, value);
        Self {
            key: key.to_string(),
            previous,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        write_var(&self.key, self.previous.as_deref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_guards_unwind_in_order() {
        let _lock = env_lock();
        let key = "COMPOSER_TEST_ENV_GUARD_NESTED";
        {
            let _outer = EnvGuard::set(key, "outer");
            {
                let _inner = EnvGuard::remove(key);
                assert!(std::env::var(key).is_err());
            }
            assert_eq!(std::env::var(key).as_deref(), Ok("outer"));
        }
        assert!(std::env::var(key).is_err());
    }
}
