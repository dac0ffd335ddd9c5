//! Edge service routines shared by both interrupt strategies.
//!
//! The hardware-facing sides (vector binding, pin registers) differ per
//! strategy, but what happens to the pipeline state on an edge is identical
//! and lives here, behind two small traits. The Consumer and Worker never
//! see which strategy produced an event.
//!
//! The routines run in interrupt context in the zero-latency build and must
//! not block, allocate, or touch the scheduler; they are limited to trait
//! calls (register writes on target) and atomics.

use crate::counter::{EventCounter, Increment, MissedEventTally};
use crate::edge::EdgeFilter;

/// A diagnostic output line. On target this is a word write to the SIO
/// set/clear registers; tests substitute a recording fake.
pub trait DiagnosticLine {
    fn set_active(&mut self);
    fn set_inactive(&mut self);
}

/// The hardware event-pending latch for the sensed edge. On target this is a
/// write-1-to-clear register; tests substitute a fake that can simulate the
/// re-entry a missing clear causes.
pub trait PendingEvent {
    fn clear(&mut self);
}

/// Body of the direct-vector handler.
///
/// The latch clear comes first: the edge event is latched level-high into the
/// interrupt line, and returning without clearing it re-enters the handler
/// immediately. The diagnostic line brackets the handler's execution so an
/// external probe can time it.
pub fn raw_edge_service<P: PendingEvent, L: DiagnosticLine>(
    pending: &mut P,
    bracket: &mut L,
    events: &EventCounter,
    missed: &MissedEventTally,
    filter: &EdgeFilter,
    now_us: u32,
) {
    pending.clear();
    bracket.set_active();
    if filter.accept(now_us)
        && let Increment::Saturated = events.increment()
    {
        missed.record();
    }
    bracket.set_inactive();
}

/// Detection half of the deferred path, run when the platform dispatcher
/// resumes the detection task.
///
/// Returns `true` if the edge started a new logical event and a deferred
/// unit should be submitted. The diagnostic line goes Active here and
/// Inactive in [`deferred_edge_finish`], bracketing the detection-to-worker
/// hand-off latency.
pub fn deferred_edge_begin<L: DiagnosticLine>(
    events: &EventCounter,
    missed: &MissedEventTally,
    filter: &EdgeFilter,
    bracket: &mut L,
    now_us: u32,
) -> bool {
    if !filter.accept(now_us) {
        return false;
    }
    if let Increment::Saturated = events.increment() {
        missed.record();
    }
    bracket.set_active();
    true
}

/// Completion half of the deferred path, run by the worker outside the
/// dispatch path.
///
/// More than one accumulated event means a previous event was still
/// outstanding when this one arrived: an overlap occurrence, recorded in the
/// tally. The count is approximate by design.
pub fn deferred_edge_finish<L: DiagnosticLine>(
    events: &EventCounter,
    missed: &MissedEventTally,
    bracket: &mut L,
) {
    bracket.set_inactive();
    if events.outstanding() > 1 {
        missed.record();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
