//! GPIO edge-interrupt latency rig for the Raspberry Pi Pico 2 (RP2350).
//!
//! Synthesizes a periodic stimulus on GPIO3, senses it on GPIO2 through a
//! jumper wire, and makes detection-to-acknowledgment latency observable on
//! diagnostic outputs.
//!
//! # Pipeline
//!
//! stimulus (GPIO3) -> jumper -> sense (GPIO2) -> edge handler ->
//! event counter -> [worker ->] consumer -> ack LED (GPIO25)
//!
//! GPIO4 brackets the detection-to-completion span for an external probe.
//!
//! # Interrupt strategies
//!
//! - default: deferred dispatch - the HAL's GPIO interrupt wakes a detection
//!   task; a worker completes each event and wakes the consumer.
//! - `zero-latency` feature: the handler is bound directly to the
//!   IO_IRQ_BANK0 vector at priority P0; the consumer polls.
//!
//! The binary only exists for the ARM target; host builds exercise the
//! library tests instead.

#![cfg_attr(target_arch = "arm", no_std)]
#![cfg_attr(target_arch = "arm", no_main)]
// Crate-level lints (match lib.rs for consistency)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

// Modules only used in the binary (not testable on host)
#[cfg(target_arch = "arm")]
mod raw_irq;
#[cfg(target_arch = "arm")]
mod tasks;

#[cfg(target_arch = "arm")]
mod firmware {
    use defmt::{info, trace, warn};
    use embassy_executor::Spawner;
    use embassy_rp::gpio::{Input, Level, Output, Pull};
    use embassy_time::{Duration, Instant, Timer, with_timeout};
    use irq_latency_pico2::config::{self, IrqStrategy};
    use irq_latency_pico2::cycles;
    use irq_latency_pico2::diag::DiagLine;
    use {defmt_rtt as _, panic_probe as _};

    use crate::raw_irq;
    use crate::tasks;
    use crate::tasks::{EVENT_READY, EVENTS, MISSED};

    // Program metadata for `picotool info`
    #[unsafe(link_section = ".bi_entries")]
    #[used]
    pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
        embassy_rp::binary_info::rp_program_name!(c"irq-latency-pico2"),
        embassy_rp::binary_info::rp_program_description!(c"GPIO edge-interrupt latency rig"),
        embassy_rp::binary_info::rp_cargo_version!(),
        embassy_rp::binary_info::rp_program_build_attribute!(),
    ];

    #[embassy_executor::main]
    async fn main(spawner: Spawner) {
        info!("latency rig starting...");

        let p = embassy_rp::init(Default::default());

        // Cycle counter feeds the latency stamps
        cycles::init(config::CPU_FREQ_HZ);

        // Pin setup. GPIO3 must be jumpered to GPIO2; keep the numbers in
        // sync with the config pin map.
        let sim_out = Output::new(p.PIN_3, Level::Low);
        let sense = Input::new(p.PIN_2, Pull::Down);

        // The bracket line is written through SIO set/clear from both
        // execution contexts via DiagLine; the HAL output stays alive here
        // to keep the pad configured.
        let _task_out = Output::new(p.PIN_4, Level::Low);

        // Acknowledgment indicator (on-board LED). A board without one is
        // the `no-ack-led` profile: disable and continue, never fail.
        let mut ack = if cfg!(feature = "no-ack-led") {
            warn!("ack indicator unavailable; acknowledgments disabled");
            None
        } else {
            Some(Output::new(p.PIN_25, Level::Low))
        };

        info!("interrupt strategy: {}", config::IRQ_STRATEGY.name());

        match config::IRQ_STRATEGY {
            IrqStrategy::Deferred => {
                spawner
                    .spawn(tasks::sense::edge_detect_task(sense, DiagLine::new(config::TASK_OUT_GPIO)))
                    .unwrap();
                spawner
                    .spawn(tasks::sense::worker_task(DiagLine::new(config::TASK_OUT_GPIO)))
                    .unwrap();
            }
            IrqStrategy::ZeroLatency => {
                raw_irq::install();
                if raw_irq::edge_pending() {
                    warn!("sense edge latch set while idle; check the loopback wiring");
                }
                // The input/pull-down pad config must outlive main; the HAL
                // would deconfigure it on drop
                core::mem::forget(sense);
            }
        }

        // Stimulus starts only once detection is armed, so the first pulse
        // is never missed
        spawner.spawn(tasks::stimulus::stimulus_task(sim_out)).unwrap();

        info!("consumer loop starting");

        let mut last_status = Instant::now();

        loop {
            // Suspension is strategy-dependent: deferred waits for the
            // worker's wake with the poll period as a backlog backstop;
            // zero-latency has no wake path and polls.
            match config::IRQ_STRATEGY {
                IrqStrategy::Deferred => {
                    let _ = with_timeout(
                        Duration::from_millis(config::CONSUMER_POLL_MS),
                        EVENT_READY.wait(),
                    )
                    .await;
                }
                IrqStrategy::ZeroLatency => {
                    Timer::after_millis(config::CONSUMER_POLL_MS).await;
                }
            }

            // At most one event per cycle: a backlog drains at this cadence
            // no matter how bursty the arrivals were
            if EVENTS.try_drain_one() {
                trace!("event consumed, {} outstanding", EVENTS.outstanding());
                if let Some(ack) = ack.as_mut() {
                    ack.set_high();
                    Timer::after_millis(config::ACK_VISIBLE_MS).await;
                    ack.set_low();
                }
            }

            if last_status.elapsed() >= Duration::from_secs(config::STATUS_LOG_SECS) {
                info!(
                    "status: outstanding={} missed={}",
                    EVENTS.outstanding(),
                    MISSED.count()
                );
                last_status = Instant::now();
            }
        }
    }
}

#[cfg(not(target_arch = "arm"))]
fn main() {
    // Firmware entry point exists only for the RP2350 target.
    // On the host, run `cargo test --lib` instead.
}
