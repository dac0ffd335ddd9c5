//! Latency rig library - testable modules for the edge-interrupt bench.
//!
//! This library contains the pipeline logic that can be tested on the host
//! machine. The binary (`main.rs`) uses this library and adds the
//! embedded-specific code: pin setup, the Embassy tasks, and the raw vector
//! binding.
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test --lib --target x86_64-unknown-linux-gnu  # Linux/macOS
//! cargo test --lib --target x86_64-pc-windows-msvc    # Windows
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), allowing use of the standard
//! test framework while the actual firmware runs as `no_std`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

// Configuration
pub mod config;

// Shared pipeline state crossing the interrupt/task boundary
pub mod counter;

// Edge qualification and the strategy-shared service routines
pub mod edge;
pub mod service;

// Diagnostics
pub mod cycles;
pub mod diag;
pub mod stats;

// Task lifecycle
pub mod control;
