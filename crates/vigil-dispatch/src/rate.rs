//! Per-round message budget.
//!
//! A fixed window: `count` grows monotonically within a round and is zeroed
//! by the external round-boundary trigger. The check-then-increment is a
//! single CAS loop, so `count` can never exceed `max_per_round` even under
//! racing callers, and two callers can never both take the last slot.

use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug)]
pub struct RateWindow {
    count: AtomicU32,
    max_per_round: u32,
}

impl RateWindow {
    pub fn new(max_per_round: u32) -> Self {
        Self {
            count: AtomicU32::new(0),
            max_per_round,
        }
    }

    /// Take one slot from the round budget. Returns `false` when the budget
    /// is exhausted; the caller drops the message (no queueing, no backoff).
    pub fn check_and_increment(&self) -> bool {
        self.count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| {
                if c >= self.max_per_round {
                    None
                } else {
                    Some(c + 1)
                }
            })
            .is_ok()
    }

    /// Zero the counter. Invoked only by the round-boundary trigger, never
    /// by the dispatcher.
    pub fn reset(&self) {
        self.count.store(0, Ordering::Release);
    }

    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Acquire)
    }

    /// Overwrite the counter. Maintenance/test hook; the dispatch path only
    /// ever moves the counter through [`check_and_increment`](Self::check_and_increment).
    pub fn set_count(&self, count: u32) {
        self.count.store(count, Ordering::Release);
    }

    pub fn max_per_round(&self) -> u32 {
        self.max_per_round
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denies_at_capacity_without_touching_count() {
        let window = RateWindow::new(2);
        assert!(window.check_and_increment());
        assert!(window.check_and_increment());
        assert!(!window.check_and_increment());
        assert_eq!(window.count(), 2);
    }

    #[test]
    fn reset_reopens_the_budget() {
        let window = RateWindow::new(1);
        assert!(window.check_and_increment());
        assert!(!window.check_and_increment());
        window.reset();
        assert!(window.check_and_increment());
    }
}
