//! crates/router/src/limiter.rs
//!
//! A simple `--max-sessions` cap, grounded on the same RAII-guard shape as
//! the original codebase's module-scoped connection limiter: acquiring a
//! slot returns a guard, and the slot is released automatically when the
//! guard drops, so a panicking session handler can never leak a count.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Caps the number of sessions active at once.
#[derive(Debug, Clone)]
pub struct ConnectionLimiter {
    active: Arc<AtomicUsize>,
    max: Option<usize>,
}

/// Held for the lifetime of one session; releases its slot on drop.
#[derive(Debug)]
pub struct ConnectionGuard {
    active: Arc<AtomicUsize>,
}

impl ConnectionLimiter {
    /// Creates a limiter allowing at most `max` concurrent sessions, or an
    /// unbounded limiter if `max` is `None`.
    #[must_use]
    pub fn new(max: Option<usize>) -> ConnectionLimiter {
        ConnectionLimiter {
            active: Arc::new(AtomicUsize::new(0)),
            max,
        }
    }

    /// Attempts to acquire a session slot, returning `None` if the
    /// configured limit has already been reached.
    pub fn acquire(&self) -> Option<ConnectionGuard> {
        loop {
            let current = self.active.load(Ordering::SeqCst);
            if let Some(max) = self.max {
                if current >= max {
                    return None;
                }
            }
            if self
                .active
                .compare_exchange(current, current + 1, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                return Some(ConnectionGuard {
                    active: Arc::clone(&self.active),
                });
            }
        }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_limiter_enforces_limits_across_guards() {
        let limiter = ConnectionLimiter::new(Some(2));
        let first = limiter.acquire().expect("first connection allowed");
        let second = limiter.acquire().expect("second connection allowed");
        assert!(limiter.acquire().is_none());

        drop(second);
        let third = limiter.acquire().expect("slot released after guard drop");

        drop(third);
        drop(first);
        assert!(limiter.acquire().is_some());
    }

    #[test]
    fn unbounded_limiter_always_grants() {
        let limiter = ConnectionLimiter::new(None);
        let guards: Vec<_> = (0..100).map(|_| limiter.acquire().unwrap()).collect();
        assert_eq!(guards.len(), 100);
    }
}
