//! Process-wide rate-limit cooldown state, shared across all callers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Per-supplier cooldown deadlines, cloneable and shared across the process.
///
/// Purely in-memory: a process restart resets every cooldown, which is
/// acceptable staleness for an externally imposed limit. Entries are created
/// on first use per supplier id and never removed.
///
/// The governor is injected wherever it is needed (orchestrator, supplier
/// client) rather than living in a global, so tests can construct isolated
/// instances.
#[derive(Debug, Clone, Default)]
pub struct RateLimitGovernor {
    deadlines: Arc<Mutex<HashMap<String, Instant>>>,
}

impl RateLimitGovernor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining cooldown for `supplier_id` in whole seconds, rounded up.
    ///
    /// Returns 0 when a request may proceed now. Safe to call before any
    /// network attempt; callers use it to reject doomed work early instead of
    /// blocking.
    #[must_use]
    pub fn seconds_until_ready(&self, supplier_id: &str) -> u64 {
        let deadlines = self
            .deadlines
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(deadline) = deadlines.get(supplier_id) else {
            return 0;
        };

        let remaining = deadline.saturating_duration_since(Instant::now());
        let mut secs = remaining.as_secs();
        if remaining.subsec_nanos() > 0 {
            secs += 1;
        }
        secs
    }

    /// Records that `supplier_id` must not be contacted for `wait`.
    ///
    /// The deadline only ever moves forward; a shorter cooldown reported
    /// concurrently never shortens one already in effect.
    pub fn apply_cooldown(&self, supplier_id: &str, wait: Duration) {
        let deadline = Instant::now() + wait;
        let mut deadlines = self
            .deadlines
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let entry = deadlines
            .entry(supplier_id.to_owned())
            .or_insert(deadline);
        if deadline > *entry {
            *entry = deadline;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_supplier_is_ready_immediately() {
        let governor = RateLimitGovernor::new();
        assert_eq!(governor.seconds_until_ready("supplier-1"), 0);
    }

    #[test]
    fn cooldown_is_reported_rounded_up_to_whole_seconds() {
        let governor = RateLimitGovernor::new();
        governor.apply_cooldown("supplier-1", Duration::from_millis(41_500));
        let wait = governor.seconds_until_ready("supplier-1");
        assert!((41..=42).contains(&wait), "unexpected wait {wait}");
    }

    #[test]
    fn cooldown_never_shortens() {
        let governor = RateLimitGovernor::new();
        governor.apply_cooldown("supplier-1", Duration::from_secs(60));
        governor.apply_cooldown("supplier-1", Duration::from_secs(5));
        assert!(governor.seconds_until_ready("supplier-1") > 50);
    }

    #[test]
    fn suppliers_are_isolated_from_each_other() {
        let governor = RateLimitGovernor::new();
        governor.apply_cooldown("supplier-1", Duration::from_secs(60));
        assert_eq!(governor.seconds_until_ready("supplier-2"), 0);
    }

    #[test]
    fn clones_share_the_same_state() {
        let governor = RateLimitGovernor::new();
        let observer = governor.clone();
        governor.apply_cooldown("supplier-1", Duration::from_secs(30));
        assert!(observer.seconds_until_ready("supplier-1") > 0);
    }

    #[test]
    fn expired_cooldown_reads_as_ready() {
        let governor = RateLimitGovernor::new();
        governor.apply_cooldown("supplier-1", Duration::ZERO);
        assert_eq!(governor.seconds_until_ready("supplier-1"), 0);
    }
}
