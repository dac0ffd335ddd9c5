//! Edge qualification for the sense line.
//!
//! The loopback wire is short and pull-down biased, but a bouncing or
//! sustained-high input must still count as one logical event. The filter
//! opens a dead window after each accepted edge; anything inside the window
//! is a glitch of the same event.
//!
//! Timestamps are injected by the caller (microseconds, wrapping u32), which
//! keeps the filter free of any clock dependency: the deferred path feeds it
//! timer micros, the raw handler feeds it cycle-derived micros, and host
//! tests feed it whatever they like.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Dead-window rising-edge filter.
///
/// Atomic state so the zero-latency handler can share the static with
/// task-context code. Only ever one producer per build, so plain
/// load/store pairs are sufficient.
pub struct EdgeFilter {
    dead_time_us: u32,
    last_accept_us: AtomicU32,
    primed: AtomicBool,
}

impl EdgeFilter {
    /// New filter; the first edge it sees is always accepted.
    pub const fn new(dead_time_us: u32) -> Self {
        Self {
            dead_time_us,
            last_accept_us: AtomicU32::new(0),
            primed: AtomicBool::new(false),
        }
    }

    /// Qualify an edge observed at `now_us`. Returns `true` if it starts a
    /// new logical event, `false` if it falls inside the dead window.
    ///
    /// Wrapping arithmetic handles timestamp rollover; at worst one edge per
    /// rollover period is misjudged, which the next stimulus pulse heals.
    pub fn accept(&self, now_us: u32) -> bool {
        if self.primed.load(Ordering::Relaxed) {
            let since = now_us.wrapping_sub(self.last_accept_us.load(Ordering::Relaxed));
            if since < self.dead_time_us {
                return false;
            }
        } else {
            self.primed.store(true, Ordering::Relaxed);
        }
        self.last_accept_us.store(now_us, Ordering::Relaxed);
        true
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_edge_accepted() {
        let filter = EdgeFilter::new(200);
        assert!(filter.accept(0));
    }

    #[test]
    fn test_bounce_inside_window_rejected() {
        let filter = EdgeFilter::new(200);
        assert!(filter.accept(1_000));
        // Contact bounce: a burst of edges within the dead window
        assert!(!filter.accept(1_010));
        assert!(!filter.accept(1_050));
        assert!(!filter.accept(1_199));
    }

    #[test]
    fn test_next_event_after_window_accepted() {
        let filter = EdgeFilter::new(200);
        assert!(filter.accept(1_000));
        assert!(filter.accept(1_200));
    }

    #[test]
    fn test_rejected_glitch_does_not_extend_window() {
        let filter = EdgeFilter::new(200);
        assert!(filter.accept(1_000));
        assert!(!filter.accept(1_150));
        // Window is anchored at the accepted edge, not the glitch
        assert!(filter.accept(1_201));
    }

    #[test]
    fn test_timestamp_wraparound() {
        let filter = EdgeFilter::new(200);
        assert!(filter.accept(u32::MAX - 50));
        // 100 us elapsed across the rollover: still inside the window
        assert!(!filter.accept(49));
        // 250 us elapsed: outside
        assert!(filter.accept(199));
    }
}
