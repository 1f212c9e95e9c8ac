// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! ADC bring-up: single software-triggered conversion on SOC0.

use embedded_hal::delay::DelayNs;

use crate::config::{ADC_ACQPS, ADC_CHANNEL, ADC_SETTLE_US, CLOCK_SETTLE_CYCLES};
use crate::hw::adc::TRIGSEL_SOFTWARE;
use crate::hw::{Chip, Eallow};

/// End-of-conversion source for ADCINT1.
const EOC0: u16 = 0;

pub fn init<C: Chip, D: DelayNs>(chip: &C, eallow: &Eallow<'_, C>, delay: &mut D) {
    let adc = chip.adc();

    chip.sysctrl().enable_adc_clock(eallow);
    chip.spin(CLOCK_SETTLE_CYCLES);
    adc.set_clock_divide_by_two(eallow);
    adc.set_non_overlap(eallow);

    adc.power_up(eallow);
    adc.enable(eallow);
    // Analog blocks need time before the first conversion is accurate
    delay.delay_us(ADC_SETTLE_US);

    adc.configure_soc0(eallow, ADC_CHANNEL, ADC_ACQPS, TRIGSEL_SOFTWARE);
    adc.route_int1(eallow, EOC0);
    adc.set_late_interrupt_pulse(eallow);
}
