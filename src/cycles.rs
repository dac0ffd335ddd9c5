//! Cycle-count timestamps using the Cortex-M33 DWT.
//!
//! Latency between detection and completion is measured in CPU cycles via the
//! Data Watchpoint and Trace (DWT) cycle counter (CYCCNT), which resolves far
//! finer than the 1 MHz system timer.
//!
//! # Overflow Handling
//!
//! The CYCCNT is a 32-bit counter; at the stock 150 MHz it wraps every
//! ~28.6 seconds (2^32 / 150M). This module uses `wrapping_sub` to correctly
//! handle counter wrap for the millisecond-scale spans measured here. Spans
//! longer than the sanity cap are reported as 0.

use core::sync::atomic::{AtomicU32, Ordering};

/// CPU frequency in Hz, set at init. Default to the stock RP2350 clock.
static CPU_FREQ_HZ: AtomicU32 = AtomicU32::new(150_000_000);

/// Maximum credible measured span. Detection-to-completion latency is
/// microseconds; anything past ~100 ms of cycles is a wrap or a stale stamp.
const MAX_SANE_CYCLES: u32 = 15_000_000;

/// Initialize the DWT cycle counter.
///
/// Must be called after `embassy_rp::init()` to enable cycle counting.
/// Safe to call multiple times (idempotent).
pub fn init(freq_hz: u32) {
    CPU_FREQ_HZ.store(freq_hz, Ordering::Relaxed);

    // Enable DWT cycle counter via raw register access.
    // DEMCR.TRCENA (bit 24) must be set first, then DWT.CTRL.CYCCNTENA (bit 0)
    #[cfg(target_arch = "arm")]
    unsafe {
        use core::ptr::{read_volatile, write_volatile};

        // DCB DEMCR register (0xE000EDFC) - enable trace
        const DEMCR: *mut u32 = 0xE000_EDFC as *mut u32;
        let demcr_val = read_volatile(DEMCR);
        write_volatile(DEMCR, demcr_val | (1 << 24)); // TRCENA bit

        // DWT CTRL register (0xE0001000) - enable cycle counter
        const DWT_CTRL: *mut u32 = 0xE000_1000 as *mut u32;
        let ctrl_val = read_volatile(DWT_CTRL);
        write_volatile(DWT_CTRL, ctrl_val | 1); // CYCCNTENA bit
    }
}

/// Read current cycle count (32-bit, wraps).
#[inline]
pub fn read() -> u32 {
    #[cfg(target_arch = "arm")]
    unsafe {
        // DWT CYCCNT register (0xE0001004)
        const DWT_CYCCNT: *const u32 = 0xE000_1004 as *const u32;
        core::ptr::read_volatile(DWT_CYCCNT)
    }
    #[cfg(not(target_arch = "arm"))]
    {
        0 // Placeholder for tests
    }
}

/// Elapsed cycles between two stamps, with wrap handling and sanity check.
#[inline]
pub fn elapsed(
    start: u32,
    end: u32,
) -> u32 {
    let elapsed = end.wrapping_sub(start);

    if elapsed > MAX_SANE_CYCLES {
        0 // Measurement error; don't pollute the statistics
    } else {
        elapsed
    }
}

/// Convert a cycle span to microseconds at the configured frequency.
#[inline]
pub fn micros(cycles: u32) -> u32 {
    let freq = CPU_FREQ_HZ.load(Ordering::Relaxed) as u64;
    if freq == 0 {
        return 0;
    }
    ((cycles as u64 * 1_000_000) / freq) as u32
}

/// Current cycle counter expressed as wrapping microseconds.
///
/// Cheap enough for interrupt context: one volatile read and one u64 divide.
#[inline]
pub fn now_micros() -> u32 { micros(read()) }

// =============================================================================
// Unit Tests (run on host with: cargo test --lib --target <host-triple>)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_normal() {
        assert_eq!(elapsed(100, 250), 150);
        assert_eq!(elapsed(0, 1_000), 1_000);
    }

    #[test]
    fn test_elapsed_wrap() {
        // Wrap from near max to near zero
        assert_eq!(elapsed(u32::MAX - 100, 100), 201);
    }

    #[test]
    fn test_elapsed_sanity_check() {
        assert_eq!(elapsed(0, MAX_SANE_CYCLES + 1), 0);
    }

    #[test]
    fn test_micros_at_stock_clock() {
        CPU_FREQ_HZ.store(150_000_000, Ordering::Relaxed);
        // 150 cycles per microsecond at 150 MHz
        assert_eq!(micros(150), 1);
        assert_eq!(micros(15_000), 100);
        assert_eq!(micros(149), 0);
    }

    #[test]
    fn test_micros_zero_freq_guard() {
        CPU_FREQ_HZ.store(0, Ordering::Relaxed);
        assert_eq!(micros(1_000), 0);
        CPU_FREQ_HZ.store(150_000_000, Ordering::Relaxed);
    }
}
