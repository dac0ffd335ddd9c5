//! Deferred strategy: edge detection through the platform dispatcher, with a
//! worker completing each event off the dispatch path.
//!
//! The GPIO interrupt is serviced by the HAL's own handler, which wakes the
//! detection task; that resumption is the deferred detection unit. The
//! worker runs from a latching signal, so a burst of events collapses into
//! one completion pass over the aggregate counter.

use defmt::{info, trace};
use embassy_rp::gpio::Input;
use embassy_time::Instant;
use irq_latency_pico2::cycles;
use irq_latency_pico2::diag::DiagLine;
use irq_latency_pico2::service;
use irq_latency_pico2::stats::LatencyWindow;

use crate::tasks::{EDGE_FILTER, EVENT_READY, EVENTS, MISSED, RUNNING, WORK_PENDING};

/// Wait for rising edges on the sense pin and start the pipeline for each
/// qualified one: count it, open the latency bracket, submit the deferred
/// unit. Nothing here blocks beyond the edge wait itself.
#[embassy_executor::task]
pub async fn edge_detect_task(
    mut sense: Input<'static>,
    mut bracket: DiagLine,
) {
    info!("edge detect task started (deferred dispatch)");

    while RUNNING.is_running() {
        sense.wait_for_rising_edge().await;
        let now_us = Instant::now().as_micros() as u32;
        if service::deferred_edge_begin(&EVENTS, &MISSED, &EDGE_FILTER, &mut bracket, now_us) {
            WORK_PENDING.signal(cycles::read());
            trace!("edge detected, {} outstanding", EVENTS.outstanding());
        }
    }

    info!("edge detect task stopped");
}

/// Complete detected events outside the dispatch path: close the latency
/// bracket, record overlap, feed the latency window, wake the consumer.
#[embassy_executor::task]
pub async fn worker_task(mut bracket: DiagLine) {
    info!("worker task started");

    let mut window = LatencyWindow::new();

    while RUNNING.is_running() {
        let detect_stamp = WORK_PENDING.wait().await;
        service::deferred_edge_finish(&EVENTS, &MISSED, &mut bracket);

        let latency_us = cycles::micros(cycles::elapsed(detect_stamp, cycles::read()));
        if let Some(s) = window.record(latency_us) {
            info!(
                "detect->worker latency over {} events: min={}us mean={}us max={}us",
                s.count, s.min_us, s.mean_us, s.max_us
            );
        }

        EVENT_READY.signal(());
    }

    info!("worker task stopped");
}
