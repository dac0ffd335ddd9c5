//! Rig configuration constants.
//!
//! Deployment profiles are Cargo features resolved here into typed constants,
//! so the rest of the crate reads one `config` value instead of scattering
//! `cfg` checks. Exactly one interrupt strategy is active per build.

// =============================================================================
// Pin Map (Pico 2)
// =============================================================================
// GPIO3 (stimulus) must be jumpered to GPIO2 (sense) on the header.
// The numbers here feed the raw register paths; `main.rs` claims the matching
// `PIN_n` singletons and must stay in sync.

/// Sensed input, pull-down biased, rising-edge triggered.
pub const SENSE_GPIO: u8 = 2;

/// Stimulus output, physically looped back to [`SENSE_GPIO`].
pub const SIM_GPIO: u8 = 3;

/// Diagnostic output bracketing detection-to-completion latency.
pub const TASK_OUT_GPIO: u8 = 4;

/// Acknowledgment indicator (on-board LED). Optional; see `no-ack-led`.
pub const ACK_GPIO: u8 = 25;

// =============================================================================
// Timing
// =============================================================================

/// Stimulus pulse width. Long enough to register against the sense line's
/// pull-down, short enough not to distort the latency measurement.
pub const PULSE_WIDTH_US: u64 = 100;

/// Idle time between stimulus pulses.
pub const STIMULUS_INTERVAL_MS: u64 = if cfg!(feature = "interval-1ms") { 1 } else { 10 };

/// Consumer poll period. Also the timeout backstop on the worker wake signal,
/// so a coalesced backlog drains even without further signals.
pub const CONSUMER_POLL_MS: u64 = 25;

/// How long the acknowledgment indicator stays lit per consumed event.
pub const ACK_VISIBLE_MS: u64 = 10;

/// Dead window after an accepted edge during which further edges are treated
/// as glitches of the same event. Well above loopback bounce, well below
/// either stimulus interval.
pub const EDGE_DEAD_TIME_US: u32 = 200;

/// Consumer status log period.
pub const STATUS_LOG_SECS: u64 = 5;

// =============================================================================
// Measurement
// =============================================================================

/// Stock RP2350 system clock. Feeds the DWT cycle-to-microsecond conversion.
pub const CPU_FREQ_HZ: u32 = 150_000_000;

/// Number of latency samples summarized per log line.
pub const LATENCY_WINDOW: usize = 64;

// =============================================================================
// Interrupt Strategy
// =============================================================================

/// How the rising edge reaches the pipeline.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum IrqStrategy {
    /// Platform interrupt dispatch resumes a detection task; a worker
    /// completes processing off the dispatch path.
    Deferred,
    /// Handler bound directly to the hardware vector at the highest NVIC
    /// priority, bypassing the framework dispatcher.
    ZeroLatency,
}

impl IrqStrategy {
    /// Display name for startup logging.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Deferred => "deferred",
            Self::ZeroLatency => "zero-latency",
        }
    }
}

/// The strategy this build runs. Selected once here; `main` matches on it in
/// exactly one place.
pub const IRQ_STRATEGY: IrqStrategy = if cfg!(feature = "zero-latency") {
    IrqStrategy::ZeroLatency
} else {
    IrqStrategy::Deferred
};

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_fits_inside_interval() {
        assert!(PULSE_WIDTH_US < STIMULUS_INTERVAL_MS * 1000);
    }

    #[test]
    fn test_dead_window_fits_inside_interval() {
        // The glitch filter must never swallow the next real pulse,
        // including under the 1 ms burst profile.
        assert!((EDGE_DEAD_TIME_US as u64) < STIMULUS_INTERVAL_MS * 1000);
        assert!(EDGE_DEAD_TIME_US as u64 >= PULSE_WIDTH_US);
    }

    #[test]
    fn test_ack_pulse_fits_inside_poll_period() {
        assert!(ACK_VISIBLE_MS < CONSUMER_POLL_MS);
    }

    #[test]
    fn test_pins_distinct() {
        let pins = [SENSE_GPIO, SIM_GPIO, TASK_OUT_GPIO, ACK_GPIO];
        for (i, a) in pins.iter().enumerate() {
            for b in &pins[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_strategy_name() {
        assert_eq!(IrqStrategy::Deferred.name(), "deferred");
        assert_eq!(IrqStrategy::ZeroLatency.name(), "zero-latency");
    }
}
