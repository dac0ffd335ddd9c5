//! Embassy tasks and the pipeline state they share.
//!
//! The statics here are the whole surface crossing execution contexts: the
//! counters and edge filter are touched from the edge handler (interrupt
//! context in the zero-latency build), the signals only ever from tasks.

pub mod sense;
pub mod stimulus;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use irq_latency_pico2::config;
use irq_latency_pico2::control::RunFlag;
use irq_latency_pico2::counter::{EventCounter, MissedEventTally};
use irq_latency_pico2::edge::EdgeFilter;

/// Detected-but-unconsumed events.
pub static EVENTS: EventCounter = EventCounter::new();

/// Overlap and saturation diagnostic tally.
pub static MISSED: MissedEventTally = MissedEventTally::new();

/// Glitch filter for the sense line, shared with the edge handler.
pub static EDGE_FILTER: EdgeFilter = EdgeFilter::new(config::EDGE_DEAD_TIME_US);

/// Stop token carried by every perpetual task. Never cleared on target.
pub static RUNNING: RunFlag = RunFlag::new();

/// Deferred unit of work: detection hands the worker the detection cycle
/// stamp. Latching, so rapid events coalesce into one submission and the
/// worker observes aggregate counter state, not event identities.
pub static WORK_PENDING: Signal<CriticalSectionRawMutex, u32> = Signal::new();

/// Worker-to-consumer wake. Latching; used by the deferred strategy only.
pub static EVENT_READY: Signal<CriticalSectionRawMutex, ()> = Signal::new();
