#![deny(missing_docs)]

//! Shared scaffolding for integration tests across the workspace: process
//! environment guards and ephemeral loopback ports/addresses.
//!
//! Kept deliberately small; it exists because [`router`](../router) and
//! [`shard`](../shard) integration tests both need the same two things
//! (a scratch `$HOME` and a free port to bind) and hand-rolling either one
//! per test file invites drift.

use std::env;
use std::net::TcpListener;
use std::sync::Mutex;

/// Serializes every [`EnvGuard`] construction process-wide. Environment
/// variables are process-global state; without this, two tests racing on
/// `$HOME` in parallel would stomp on each other regardless of how careful
/// each individual guard is.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Sets (or unsets) a process environment variable for the lifetime of the
/// guard, restoring its previous value (or absence) on drop.
pub struct EnvGuard {
    key: &'static str,
    previous: Option<String>,
}

impl EnvGuard {
    /// Sets `key` to `value`, remembering whatever was there before.
    #[must_use]
    #[allow(unsafe_code)]
    pub fn set(key: &'static str, value: &str) -> EnvGuard {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let previous = env::var(key).ok();
        // SAFETY: callers only use this from single-threaded test bodies
        // serialized by `ENV_LOCK`; no other thread observes the mutation
        // mid-flight.
        unsafe {
            env::set_var(key, value);
        }
        EnvGuard { key, previous }
    }

    /// Removes `key` entirely, remembering its previous value if any.
    #[must_use]
    #[allow(unsafe_code)]
    pub fn unset(key: &'static str) -> EnvGuard {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let previous = env::var(key).ok();
        // SAFETY: see `set`.
        unsafe {
            env::remove_var(key);
        }
        EnvGuard { key, previous }
    }
}

impl Drop for EnvGuard {
    #[allow(unsafe_code)]
    fn drop(&mut self) {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        // SAFETY: see `set`.
        unsafe {
            match &self.previous {
                Some(value) => env::set_var(self.key, value),
                None => env::remove_var(self.key),
            }
        }
    }
}

/// Binds an OS-assigned loopback port and immediately releases it,
/// returning the address a test server can then bind for itself.
///
/// There is an inherent TOCTOU gap between release and rebind; acceptable
/// here because tests run in a private network namespace with no other
/// process competing for ports.
#[must_use]
pub fn allocate_loopback_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind ephemeral port");
    let addr = listener.local_addr().expect("listener has no local addr");
    drop(listener);
    addr.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_guard_restores_previous_value_on_drop() {
        let _outer = EnvGuard::set("TEST_SUPPORT_PROBE", "outer");
        {
            let _inner = EnvGuard::set("TEST_SUPPORT_PROBE", "inner");
            assert_eq!(env::var("TEST_SUPPORT_PROBE").unwrap(), "inner");
        }
        assert_eq!(env::var("TEST_SUPPORT_PROBE").unwrap(), "outer");
    }

    #[test]
    fn env_guard_restores_absence_on_drop() {
        let _guard = EnvGuard::unset("TEST_SUPPORT_DEFINITELY_UNSET");
        assert!(env::var("TEST_SUPPORT_DEFINITELY_UNSET").is_err());
    }

    #[test]
    fn allocate_loopback_addr_yields_connectable_address() {
        let addr = allocate_loopback_addr();
        assert!(addr.starts_with("127.0.0.1:"));
    }
}
