// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Interrupt handlers.
//!
//! Both live in PIE group 1, so neither can preempt the other: the group stays
//! blocked from acceptance until the running handler writes PIEACK, which is
//! why the acknowledge comes last in each.
//!
//! The sample stored on a tick is the result of the conversion forced on the
//! previous tick, never the one this tick requests.

use crate::gpio::Button;
use crate::hw::Chip;
use crate::interrupts::InterruptId;
use crate::pwm::duty_compare;
use crate::state::SharedState;

/// CPU timer 0, 100 kHz.
pub fn timer_tick<C: Chip>(chip: &C, state: &SharedState) {
    let pressed = Button::new(chip).is_pressed();
    state.set_push_button_pressed(pressed);

    state.push_sample(state.measured_value());

    let compare = duty_compare(state.tbprd(), pressed);
    state.set_compare_value(compare);
    chip.epwm1().set_compare_a(compare);

    chip.adc().force_soc0();

    chip.pie().acknowledge(InterruptId::TInt0.group());
}

/// ADCINT1, end of SOC0.
pub fn adc_complete<C: Chip>(chip: &C, state: &SharedState) {
    let adc = chip.adc();
    state.set_measured_value(adc.result0());
    adc.clear_int1();

    chip.pie().acknowledge(InterruptId::AdcInt1.group());
}
