//! Cooperative stop flag for the long-lived tasks.
//!
//! The pipeline is perpetual on target and the flag is never cleared there;
//! it exists so the task loop bodies stay bounded and drivable off-target.

use core::sync::atomic::{AtomicBool, Ordering};

/// Shared run/stop token checked by each task loop.
pub struct RunFlag(AtomicBool);

impl RunFlag {
    pub const fn new() -> Self { Self(AtomicBool::new(true)) }

    #[inline]
    pub fn is_running(&self) -> bool { self.0.load(Ordering::Relaxed) }

    /// Ask the loops to wind down at their next iteration.
    pub fn stop(&self) { self.0.store(false, Ordering::Relaxed) }
}

impl Default for RunFlag {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_running() {
        assert!(RunFlag::new().is_running());
    }

    #[test]
    fn test_stop_is_observed() {
        let flag = RunFlag::new();
        flag.stop();
        assert!(!flag.is_running());
    }
}
