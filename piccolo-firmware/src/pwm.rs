// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! ePWM1 setup and duty-cycle selection.

use crate::config::{
    CLOCK_SETTLE_CYCLES, DUTY_PRESSED_PERCENT, DUTY_RELEASED_PERCENT, PWM_FREQ_HZ,
    PWM_OUTPUT_PIN, PWM_RESET_PIN, SYSCLK_HZ,
};
use crate::hw::epwm::{Action, CounterMode, Output, SocEvent};
use crate::hw::gpio::{Direction, MUX_EPWM1A, MUX_GPIO};
use crate::hw::{Chip, Eallow};
use crate::state::SharedState;

/// TBPRD for up-down counting: f_pwm = SYSCLK / (2 * TBPRD).
pub const fn period(sysclk_hz: u32, pwm_hz: u32) -> u16 {
    (sysclk_hz / (2 * pwm_hz)) as u16
}

/// CMPA for the button state, rounded to the nearest count.
pub const fn duty_compare(tbprd: u16, pressed: bool) -> u16 {
    let percent = if pressed {
        DUTY_PRESSED_PERCENT
    } else {
        DUTY_RELEASED_PERCENT
    };
    ((tbprd as u32 * percent + 50) / 100) as u16
}

/// Configure ePWM1 and return TBPRD, which is also stored in `state`.
pub fn init<C: Chip>(chip: &C, eallow: &Eallow<'_, C>, state: &SharedState) -> u16 {
    let pwm = chip.epwm1();
    let sysctrl = chip.sysctrl();
    let gpio = chip.gpio();

    sysctrl.enable_epwm1_clock(eallow);
    chip.spin(CLOCK_SETTLE_CYCLES);

    let tbprd = period(SYSCLK_HZ, PWM_FREQ_HZ);
    state.set_tbprd(tbprd);
    pwm.set_counter_mode(CounterMode::UpDown);
    pwm.set_period(tbprd);
    pwm.set_clock_dividers(0, 0);

    // A low above CMPA, B high above CMPA: complementary from one compare
    pwm.set_compare_actions(Output::A, Action::Clear, Action::Set);
    pwm.set_compare_actions(Output::B, Action::Set, Action::Clear);

    pwm.enable_soc_a(SocEvent::CounterPeriod);

    // Time base clocks start only after everything above is in place
    sysctrl.set_tbclk_sync(eallow, true);
    chip.spin(CLOCK_SETTLE_CYCLES);

    pwm.set_compare_a(duty_compare(tbprd, false));
    gpio.set_mux(eallow, PWM_OUTPUT_PIN, MUX_EPWM1A);

    gpio.set_mux(eallow, PWM_RESET_PIN, MUX_GPIO);
    gpio.set_direction(eallow, PWM_RESET_PIN, Direction::Output);
    gpio.set_high(PWM_RESET_PIN);

    tbprd
}
