// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Watchdog servicing from the idle loop.

use piccolo_firmware::config::WDCR_DISABLE;
use piccolo_firmware::hw::{sysctrl, Chip};
use piccolo_firmware::sim::{SimChip, Simulation};
use piccolo_firmware::{watchdog, Error, SharedState};

/// 20 ms at 90 MHz, longer than the 13.1 ms watchdog timeout.
const PAST_TIMEOUT_CYCLES: u32 = 1_800_000;

#[test]
fn test_idle_loop_keeps_watchdog_fed() {
    let chip = SimChip::new();
    let state = SharedState::new();
    let mut sim = Simulation::boot(&chip, &state).unwrap();

    sim.run_cycles(PAST_TIMEOUT_CYCLES as u64).unwrap();

    let stats = chip.stats();
    assert_eq!(stats.watchdog_resets, 0);
    assert!(stats.watchdog_services > 0);
    assert!(sim.ticks() > 1_000);
}

#[test]
fn test_starved_watchdog_resets() {
    let chip = SimChip::new();
    let state = SharedState::new();
    let _sim = Simulation::boot(&chip, &state).unwrap();

    chip.advance(PAST_TIMEOUT_CYCLES);

    assert!(chip.take_reset());
    assert!(!chip.take_reset());
    assert_eq!(chip.stats().watchdog_resets, 1);
}

#[test]
fn test_step_reports_reset() {
    let chip = SimChip::new();
    let state = SharedState::new();
    let mut sim = Simulation::boot(&chip, &state).unwrap();

    chip.advance(PAST_TIMEOUT_CYCLES);

    assert_eq!(sim.step(), Err(Error::WatchdogReset));
}

#[test]
fn test_each_pass_writes_both_keys() {
    let chip = SimChip::new();
    let state = SharedState::new();
    let mut sim = Simulation::boot(&chip, &state).unwrap();

    for _ in 0..100 {
        sim.step().unwrap();
        assert!(!chip.watchdog_armed());
    }
    assert_eq!(chip.stats().watchdog_services, 100);
}

#[test]
fn test_service_without_outer_guard() {
    let chip = SimChip::new();

    watchdog::service(&chip);

    assert_eq!(chip.stats().watchdog_services, 1);
    assert_eq!(chip.stats().protection_faults, 0);
    assert!(!chip.eallow_active());
    assert_eq!(chip.peek(sysctrl::WDCNTR), 0);
}

#[test]
fn test_disabled_watchdog_never_resets() {
    let chip = SimChip::new();
    {
        let eallow = chip.eallow();
        watchdog::disable(&chip, &eallow);
    }
    assert_eq!(chip.peek(sysctrl::WDCR), WDCR_DISABLE);

    chip.advance(PAST_TIMEOUT_CYCLES);

    assert!(!chip.take_reset());
}

#[test]
fn test_bad_check_bits_reset_immediately() {
    let chip = SimChip::new();
    {
        let _eallow = chip.eallow();
        chip.write(sysctrl::WDCR, 0x0040);
    }
    assert!(chip.take_reset());
}
