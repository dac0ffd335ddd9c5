//! Shared event counters crossing the interrupt/task boundary.
//!
//! [`EventCounter`] and [`MissedEventTally`] are the only mutable state the
//! interrupt-side producer and the task-side consumer share.
//!
//! # Memory ordering contract
//!
//! All accesses use `Ordering::Relaxed`. The counter value itself is the only
//! payload transferred between contexts; no other memory is published through
//! it (the diagnostic pins are volatile MMIO and carry no data dependency).
//! Correctness therefore rests solely on the atomicity of single-word
//! read-modify-write, which `fetch_update` provides on every target this
//! builds for. Anything that starts publishing additional state through these
//! counters must upgrade the ordering along with it.

use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

/// Outcome of recording a detected event.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Increment {
    /// Event counted; carries the new number of outstanding events.
    Counted(u8),
    /// Counter already at `u8::MAX`; the arrival was dropped from the count.
    Saturated,
}

/// Number of detected-but-unconsumed events.
///
/// Producers (the edge handler or the resumed detection task) increment; the
/// single consumer decrements. Increments saturate at `u8::MAX` instead of
/// wrapping - a wrapped counter would silently forget 256 events, while a
/// saturated one visibly pins at the ceiling and the drop is recorded in the
/// [`MissedEventTally`] by the caller. Decrements stop at zero.
pub struct EventCounter(AtomicU8);

impl EventCounter {
    /// New counter with no outstanding events.
    pub const fn new() -> Self { Self(AtomicU8::new(0)) }

    /// Record one detected event.
    pub fn increment(&self) -> Increment {
        match self.0.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_add(1)) {
            Ok(prev) => Increment::Counted(prev + 1),
            Err(_) => Increment::Saturated,
        }
    }

    /// Consume one event if any is outstanding. Never drops below zero.
    pub fn try_drain_one(&self) -> bool {
        self.0
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok()
    }

    /// Current number of outstanding events.
    pub fn outstanding(&self) -> u8 { self.0.load(Ordering::Relaxed) }
}

impl Default for EventCounter {
    fn default() -> Self { Self::new() }
}

/// Diagnostic count of overlap occurrences and saturation drops.
///
/// Monotonically increasing, never reset, saturating at `u32::MAX`.
/// Approximate by design: it records that information was lost, not exactly
/// how much.
pub struct MissedEventTally(AtomicU32);

impl MissedEventTally {
    /// New tally at zero.
    pub const fn new() -> Self { Self(AtomicU32::new(0)) }

    /// Record one loss occurrence.
    pub fn record(&self) {
        let _ = self
            .0
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| Some(n.saturating_add(1)));
    }

    /// Total recorded loss occurrences.
    pub fn count(&self) -> u32 { self.0.load(Ordering::Relaxed) }
}

impl Default for MissedEventTally {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_counter_is_empty() {
        let events = EventCounter::new();
        assert_eq!(events.outstanding(), 0);
    }

    #[test]
    fn test_increment_counts_up() {
        let events = EventCounter::new();
        assert_eq!(events.increment(), Increment::Counted(1));
        assert_eq!(events.increment(), Increment::Counted(2));
        assert_eq!(events.outstanding(), 2);
    }

    #[test]
    fn test_drain_never_goes_below_zero() {
        let events = EventCounter::new();
        assert!(!events.try_drain_one());
        assert_eq!(events.outstanding(), 0);

        events.increment();
        assert!(events.try_drain_one());
        assert!(!events.try_drain_one());
        assert_eq!(events.outstanding(), 0);
    }

    #[test]
    fn test_increment_saturates_at_max() {
        let events = EventCounter::new();
        for _ in 0..u8::MAX {
            assert!(matches!(events.increment(), Increment::Counted(_)));
        }
        assert_eq!(events.outstanding(), u8::MAX);

        // The 256th arrival is dropped, not wrapped
        assert_eq!(events.increment(), Increment::Saturated);
        assert_eq!(events.outstanding(), u8::MAX);
    }

    #[test]
    fn test_saturated_counter_still_drains() {
        let events = EventCounter::new();
        for _ in 0..u8::MAX {
            events.increment();
        }
        events.increment();
        assert!(events.try_drain_one());
        assert_eq!(events.outstanding(), u8::MAX - 1);
    }

    #[test]
    fn test_tally_is_monotonic() {
        let missed = MissedEventTally::new();
        assert_eq!(missed.count(), 0);
        missed.record();
        missed.record();
        assert_eq!(missed.count(), 2);
    }

    #[test]
    fn test_backlog_drains_one_per_cycle() {
        // Producer three times faster than the drain cadence: the counter
        // only ever steps down by one per consumer cycle and never dips
        // below zero, regardless of burstiness.
        let events = EventCounter::new();
        let missed = MissedEventTally::new();
        let mut tally_history = [0u32; 8];

        for cycle in 0..8 {
            for _ in 0..3 {
                if events.increment() == Increment::Saturated {
                    missed.record();
                }
            }
            if events.outstanding() > 1 {
                missed.record();
            }
            let before = events.outstanding();
            events.try_drain_one();
            assert_eq!(before - events.outstanding(), 1);
            tally_history[cycle] = missed.count();
        }

        // Overlap tally grows monotonically over the observation window
        assert!(tally_history.windows(2).all(|w| w[0] <= w[1]));
        assert!(tally_history[7] > 0);
    }
}
