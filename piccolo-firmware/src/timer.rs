// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! CPU timer 0 as the sampling tick.

use crate::config::{SYSCLK_HZ, TIMER_TICK_HZ};
use crate::hw::Chip;

/// PRD for a tick rate: f_tick = SYSCLK / ((TDDR + 1) * (PRD + 1)) with TDDR = 0.
pub const fn period(sysclk_hz: u32, tick_hz: u32) -> u32 {
    sysclk_hz / tick_hz - 1
}

/// Configure the tick and arm its interrupt, leaving the timer stopped.
pub fn init<C: Chip>(chip: &C) {
    let timer = chip.cpu_timer0();
    timer.set_period(period(SYSCLK_HZ, TIMER_TICK_HZ));
    timer.set_prescaler(0);
    timer.stop();
    timer.reload();
    timer.enable_interrupt();
}

/// Must only run once vectors, ADC and PWM are configured.
pub fn start<C: Chip>(chip: &C) {
    chip.cpu_timer0().start();
}
