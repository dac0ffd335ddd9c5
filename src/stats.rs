//! Windowed latency statistics.
//!
//! The worker feeds one sample per completed event; when the window fills, a
//! summary comes back for logging and the window restarts. Fixed capacity,
//! no allocation.

use heapless::Vec;

use crate::config::LATENCY_WINDOW;

/// Summary of one full window of samples.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct WindowSummary {
    pub count: u32,
    pub min_us: u32,
    pub mean_us: u32,
    pub max_us: u32,
}

/// Accumulates latency samples in microseconds.
pub struct LatencyWindow {
    samples: Vec<u32, LATENCY_WINDOW>,
}

impl LatencyWindow {
    pub const fn new() -> Self { Self { samples: Vec::new() } }

    /// Record one sample. Returns the summary when this sample fills the
    /// window; the window is empty again afterwards.
    pub fn record(
        &mut self,
        sample_us: u32,
    ) -> Option<WindowSummary> {
        // Capacity is LATENCY_WINDOW, so the push cannot fail here
        self.samples.push(sample_us).ok();
        if !self.samples.is_full() {
            return None;
        }

        let mut min_us = u32::MAX;
        let mut max_us = 0;
        let mut sum: u64 = 0;
        for &s in self.samples.iter() {
            min_us = min_us.min(s);
            max_us = max_us.max(s);
            sum += s as u64;
        }
        let count = self.samples.len() as u32;
        self.samples.clear();

        Some(WindowSummary {
            count,
            min_us,
            mean_us: (sum / count as u64) as u32,
            max_us,
        })
    }
}

impl Default for LatencyWindow {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Unit Tests
// =============================================================================
