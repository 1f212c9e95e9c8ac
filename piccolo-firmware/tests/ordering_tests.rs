// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Register write order during PWM bring-up and inside the handlers.

use std::cell::RefCell;

use piccolo_firmware::hw::{epwm, pie, sysctrl, Chip};
use piccolo_firmware::sim::SimChip;
use piccolo_firmware::{isr, pwm, SharedState};

/// Chip that logs every register write it forwards.
struct RecordingChip {
    inner: SimChip,
    writes: RefCell<Vec<(u32, u16)>>,
}

impl RecordingChip {
    fn new() -> Self {
        Self {
            inner: SimChip::new(),
            writes: RefCell::new(Vec::new()),
        }
    }

    fn take_writes(&self) -> Vec<(u32, u16)> {
        self.writes.take()
    }
}

impl Chip for RecordingChip {
    fn read(&self, addr: u32) -> u16 {
        self.inner.read(addr)
    }

    fn write(&self, addr: u32, value: u16) {
        self.writes.borrow_mut().push((addr, value));
        self.inner.write(addr, value);
    }

    fn set_eallow(&self, allow: bool) -> bool {
        self.inner.set_eallow(allow)
    }

    fn set_ier(&self, mask: u16) {
        self.inner.set_ier(mask)
    }

    fn enable_interrupts(&self) {
        self.inner.enable_interrupts()
    }

    fn spin(&self, cycles: u32) {
        self.inner.spin(cycles)
    }
}

fn last_write_to(writes: &[(u32, u16)], addrs: &[u32]) -> usize {
    writes
        .iter()
        .rposition(|(addr, _)| addrs.contains(addr))
        .unwrap()
}

#[test]
fn test_timer_tick_acknowledges_last() {
    let chip = RecordingChip::new();
    let state = SharedState::new();
    state.set_tbprd(45_000);

    isr::timer_tick(&chip, &state);

    let writes = chip.take_writes();
    assert_eq!(writes.last(), Some(&(pie::PIEACK, pie::ack_mask(1))));
    assert_eq!(writes.iter().filter(|(a, _)| *a == pie::PIEACK).count(), 1);
}

#[test]
fn test_adc_complete_acknowledges_last() {
    let chip = RecordingChip::new();
    let state = SharedState::new();

    isr::adc_complete(&chip, &state);

    let writes = chip.take_writes();
    assert_eq!(writes.last(), Some(&(pie::PIEACK, pie::ack_mask(1))));
    assert_eq!(writes.iter().filter(|(a, _)| *a == pie::PIEACK).count(), 1);
}

#[test]
fn test_tbclksync_enabled_after_pwm_configuration() {
    let chip = RecordingChip::new();
    let state = SharedState::new();
    {
        let eallow = chip.eallow();
        pwm::init(&chip, &eallow, &state);
    }

    let writes = chip.take_writes();
    let sync = writes
        .iter()
        .position(|&(addr, value)| {
            addr == sysctrl::PCLKCR0 && value & sysctrl::TBCLKSYNC.mask() != 0
        })
        .unwrap();

    let configuration = [
        epwm::TBCTL,
        epwm::TBPRD,
        epwm::AQCTLA,
        epwm::AQCTLB,
        epwm::ETSEL,
        epwm::ETPS,
    ];
    for reg in configuration {
        assert!(
            last_write_to(&writes, &[reg]) < sync,
            "register 0x{:04x} written after TBCLKSYNC",
            reg
        );
    }
    // Duty is loaded once the time base is running
    assert!(last_write_to(&writes, &[epwm::CMPA]) > sync);
}
