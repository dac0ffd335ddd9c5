//! Zero-latency strategy: the edge handler bound directly to the hardware
//! vector, bypassing the HAL's interrupt dispatch.
//!
//! The active vector table is copied into RAM, the `IO_IRQ_BANK0` entry is
//! repointed at [`raw_edge_isr`], and VTOR is switched over. The interrupt
//! runs at NVIC priority P0, above every HAL-managed interrupt and above
//! critical sections implemented via BASEPRI masking. At that tier nothing
//! in the handler may block or touch the scheduler: the body is raw register
//! writes and atomics only, and no cross-context wake is issued - the
//! consumer polls instead.
//!
//! Register addresses from the RP2350 datasheet, IO_BANK0 register list
//! (base 0x40028000; 8 GPIOs per interrupt register, 4 event bits per GPIO):
//! - INTR0..INTR5:       0x230.. - raw event latches, write-1-to-clear
//! - PROC0_INTE0..5:     0x248.. - per-event routing to the proc0 IRQ line
//! The +0x2000 alias applies a write as an atomic bit-set.

use core::ptr::{addr_of_mut, read_volatile, write_volatile};

use cortex_m::asm;
use cortex_m::peripheral::SCB;
use defmt::info;
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use irq_latency_pico2::config;
use irq_latency_pico2::cycles;
use irq_latency_pico2::diag::DiagLine;
use irq_latency_pico2::service::{self, PendingEvent};

use crate::tasks::{EDGE_FILTER, EVENTS, MISSED};

const IO_BANK0_BASE: u32 = 0x4002_8000;
const INTR_BASE: u32 = IO_BANK0_BASE + 0x230;
const PROC0_INTE_BASE: u32 = IO_BANK0_BASE + 0x248;
const ATOMIC_SET: u32 = 0x2000;

/// Bit position of a GPIO's EDGE_HIGH event within its interrupt register.
/// Event layout per GPIO: LEVEL_LOW, LEVEL_HIGH, EDGE_LOW, EDGE_HIGH.
const fn edge_high_bit(pin: u8) -> u32 { 1 << ((pin as u32 % 8) * 4 + 3) }

const fn irq_reg_index(pin: u8) -> u32 { pin as u32 / 8 }

/// IO_IRQ_BANK0 position in the NVIC, from the RP2350 datasheet interrupt
/// map. Must match the entry patched into the vector table.
const IO_IRQ_BANK0_NUM: usize = 21;

/// Armv8-M core exceptions plus the RP2350's 52 device interrupts.
const VECTOR_COUNT: usize = 16 + 52;

/// RAM copy of the vector table. VTOR requires table-size alignment; the
/// next power of two above 68 words is 512 bytes.
#[repr(C, align(512))]
struct VectorTable([u32; VECTOR_COUNT]);

static mut RAM_VECTORS: VectorTable = VectorTable([0; VECTOR_COUNT]);

/// The sense pin's event-pending latch in IO_BANK0.
struct EdgeLatch {
    intr: *mut u32,
    mask: u32,
}

impl EdgeLatch {
    fn for_pin(pin: u8) -> Self {
        Self {
            intr: (INTR_BASE + irq_reg_index(pin) * 4) as *mut u32,
            mask: edge_high_bit(pin),
        }
    }
}

impl PendingEvent for EdgeLatch {
    fn clear(&mut self) {
        // SAFETY: write-1-to-clear; only our event bit is written
        unsafe { write_volatile(self.intr, self.mask) }
    }
}

/// Rebind IO_IRQ_BANK0 to the raw handler and enable the rising-edge event.
///
/// Called once at startup, before the stimulus starts; the binding is never
/// undone. The caller must keep the sense pin configured as a pulled-down
/// input for the lifetime of the program.
pub fn install() {
    let pin = config::SENSE_GPIO;

    unsafe {
        // SAFETY: interrupts for this vector are not yet enabled for the
        // pin; the table copy and VTOR switch happen before any use
        let scb = &*SCB::PTR;
        let active = scb.vtor.read() as *const u32;
        let table = addr_of_mut!(RAM_VECTORS);
        core::ptr::copy_nonoverlapping(active, (*table).0.as_mut_ptr(), VECTOR_COUNT);

        let handler: extern "C" fn() = raw_edge_isr;
        (*table).0[16 + IO_IRQ_BANK0_NUM] = handler as usize as u32;

        scb.vtor.write(table as u32);
        asm::dsb();
        asm::isb();

        // Drop any stale latched event, then route the rising edge to proc0
        EdgeLatch::for_pin(pin).clear();
        let inte = (PROC0_INTE_BASE + irq_reg_index(pin) * 4 + ATOMIC_SET) as *mut u32;
        write_volatile(inte, edge_high_bit(pin));
    }

    interrupt::IO_IRQ_BANK0.set_priority(Priority::P0);
    // SAFETY: the patched vector is in place and the handler is self-contained
    unsafe { interrupt::IO_IRQ_BANK0.enable() };

    info!(
        "zero-latency handler installed: vector {} at priority P0, gpio {}",
        IO_IRQ_BANK0_NUM, pin
    );
}

/// The direct-vector handler. Runs at P0: no blocking, no scheduler, no
/// logging. The latch clear comes first - the edge event is latched into
/// the IRQ line and returning without clearing it re-enters immediately.
extern "C" fn raw_edge_isr() {
    let mut latch = EdgeLatch::for_pin(config::SENSE_GPIO);
    let mut bracket = DiagLine::new(config::TASK_OUT_GPIO);
    service::raw_edge_service(
        &mut latch,
        &mut bracket,
        &EVENTS,
        &MISSED,
        &EDGE_FILTER,
        cycles::now_micros(),
    );
}

/// Read back the raw event latch state for the sense pin. Startup uses this
/// as a sanity probe after install; it must be clear when the line is idle.
pub fn edge_pending() -> bool {
    let pin = config::SENSE_GPIO;
    let intr = (INTR_BASE + irq_reg_index(pin) * 4) as *const u32;
    // SAFETY: plain read of a status register
    unsafe { read_volatile(intr) & edge_high_bit(pin) != 0 }
}
