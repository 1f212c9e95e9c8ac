// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Sampling and PWM duty-control firmware for the C2000 Piccolo.
//!
//! A 100 kHz CPU timer interrupt stores the latest ADC result in a circular
//! buffer, picks a 10% or 90% ePWM1A duty cycle from the push button, and
//! forces the next conversion. The ADC interrupt latches the result. The main
//! path only services the watchdog.
//!
//! This crate supports both `no_std` (embedded) and `std` (host) environments:
//! - Default: `no_std` mode for embedded targets
//! - `std` feature: Enables `std` support for host tools
//! - `defmt` feature: Boot and fault logging through `defmt`
//!
//! Register access goes through the [`hw::Chip`] trait. The [`sim`] module
//! provides a simulated chip so the firmware can run and be tested on a host.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod adc;
pub mod boot;
pub mod clock;
pub mod config;
pub mod error;
pub mod firmware;
pub mod gpio;
pub mod hw;
pub mod interrupts;
pub mod isr;
pub mod pwm;
pub mod sim;
pub mod state;
pub mod timer;
pub mod watchdog;

// Re-export commonly used types
pub use error::{Error, Result};
pub use firmware::Firmware;
pub use hw::{Chip, Eallow};
pub use interrupts::{InterruptId, VectorTable};
pub use state::{SharedState, Snapshot};
