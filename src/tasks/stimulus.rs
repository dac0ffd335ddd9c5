//! Stimulus generator: emulates the external sensor on a looped-back pin.

use defmt::info;
use embassy_rp::gpio::Output;
use embassy_time::Timer;
use irq_latency_pico2::config;

use crate::tasks::RUNNING;

/// Pulse the stimulus line forever: high for the pulse width, low for the
/// configured interval. The pulse is what the sense pin's rising-edge
/// trigger fires on; the interval sets the arrival rate under test.
#[embassy_executor::task]
pub async fn stimulus_task(mut sim_out: Output<'static>) {
    info!(
        "stimulus task started: {}us pulse every {}ms",
        config::PULSE_WIDTH_US,
        config::STIMULUS_INTERVAL_MS
    );

    while RUNNING.is_running() {
        sim_out.set_high();
        Timer::after_micros(config::PULSE_WIDTH_US).await;
        sim_out.set_low();
        Timer::after_millis(config::STIMULUS_INTERVAL_MS).await;
    }

    info!("stimulus task stopped");
}
