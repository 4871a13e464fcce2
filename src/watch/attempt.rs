//! Attempt tokens for async lookups
//!
//! Each new attempt invalidates every earlier one. A result produced under an old token
//! is dropped instead of being applied.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::errors::{CfsError, Result};

/// Identifies one attempt issued by an [`AttemptCounter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttemptToken(u64);

impl AttemptToken {
    pub fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct AttemptCounter {
    current: AtomicU64,
}

impl AttemptCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new attempt, superseding any in flight
    pub fn begin(&self) -> AttemptToken {
        AttemptToken(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Invalidate the current attempt without starting another
    pub fn invalidate(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_current(&self, token: AttemptToken) -> bool {
        self.current.load(Ordering::SeqCst) == token.0
    }

    /// Pass `value` through if `token` is still current, otherwise discard it
    pub fn accept<T>(&self, token: AttemptToken, value: T) -> Result<T> {
        if self.is_current(token) {
            Ok(value)
        } else {
            tracing::debug!(attempt = token.0, "discarding stale result");
            Err(CfsError::StaleAttempt(token.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_attempt_supersedes_old() {
        let counter = AttemptCounter::new();
        let first = counter.begin();
        assert!(counter.is_current(first));

        let second = counter.begin();
        assert!(!counter.is_current(first));
        assert!(counter.is_current(second));
        assert_ne!(first, second);
    }

    #[test]
    fn test_accept_discards_stale_result() {
        let counter = AttemptCounter::new();
        let first = counter.begin();
        let second = counter.begin();

        assert!(matches!(counter.accept(first, "old"), Err(CfsError::StaleAttempt(1))));
        assert_eq!(counter.accept(second, "new").unwrap(), "new");
    }

    #[test]
    fn test_invalidate_cancels_current() {
        let counter = AttemptCounter::new();
        let token = counter.begin();
        counter.invalidate();
        assert!(!counter.is_current(token));
    }
}
