// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! ADC control and result registers.

use core::ops::Range;

use super::{Chip, Eallow, Field};

pub const BASE: u32 = 0x7100;
pub const REGION: Range<u32> = BASE..BASE + 0x80;

pub const ADCCTL1: u32 = BASE;
pub const ADCCTL2: u32 = BASE + 0x01;
pub const ADCINTFLG: u32 = BASE + 0x04;
pub const ADCINTFLGCLR: u32 = BASE + 0x05;
pub const INTSEL1N2: u32 = BASE + 0x08;
pub const ADCSOCFRC1: u32 = BASE + 0x1A;
pub const ADCSOC0CTL: u32 = BASE + 0x20;

pub const RESULT_BASE: u32 = 0x0B00;
pub const ADCRESULT0: u32 = RESULT_BASE;

pub const INTPULSEPOS: Field = Field::bit(ADCCTL1, 2);
pub const ADCREFPWD: Field = Field::bit(ADCCTL1, 5);
pub const ADCBGPWD: Field = Field::bit(ADCCTL1, 6);
pub const ADCPWDN: Field = Field::bit(ADCCTL1, 7);
pub const ADCENABLE: Field = Field::bit(ADCCTL1, 14);

pub const CLKDIV2EN: Field = Field::bit(ADCCTL2, 0);
pub const ADCNONOVERLAP: Field = Field::bit(ADCCTL2, 1);

pub const INT1SEL: Field = Field::new(INTSEL1N2, 0, 5);
pub const INT1E: Field = Field::bit(INTSEL1N2, 5);

pub const ACQPS: Field = Field::new(ADCSOC0CTL, 0, 6);
pub const CHSEL: Field = Field::new(ADCSOC0CTL, 6, 4);
pub const TRIGSEL: Field = Field::new(ADCSOC0CTL, 11, 5);

/// ADCINT1 bit in ADCINTFLG / ADCINTFLGCLR.
pub const ADCINT1: u16 = 1 << 0;
/// SOC0 bit in ADCSOCFRC1.
pub const SOC0: u16 = 1 << 0;
/// TRIGSEL value for software-only triggering.
pub const TRIGSEL_SOFTWARE: u16 = 0;

pub struct AdcRegs<'a, C: Chip> {
    chip: &'a C,
}

impl<'a, C: Chip> AdcRegs<'a, C> {
    pub fn new(chip: &'a C) -> Self {
        Self { chip }
    }

    /// ADCCLK = SYSCLK / 2.
    pub fn set_clock_divide_by_two(&self, _: &Eallow<'_, C>) {
        self.chip.set(CLKDIV2EN, 1);
    }

    pub fn set_non_overlap(&self, _: &Eallow<'_, C>) {
        self.chip.set(ADCNONOVERLAP, 1);
    }

    /// Power the analog core, bandgap and reference buffers.
    pub fn power_up(&self, _: &Eallow<'_, C>) {
        self.chip.set(ADCPWDN, 1);
        self.chip.set(ADCBGPWD, 1);
        self.chip.set(ADCREFPWD, 1);
    }

    pub fn enable(&self, _: &Eallow<'_, C>) {
        self.chip.set(ADCENABLE, 1);
    }

    pub fn configure_soc0(&self, _: &Eallow<'_, C>, channel: u16, acqps: u16, trigsel: u16) {
        self.chip.set(CHSEL, channel);
        self.chip.set(ACQPS, acqps);
        self.chip.set(TRIGSEL, trigsel);
    }

    /// Raise ADCINT1 on end of conversion `eoc`.
    pub fn route_int1(&self, _: &Eallow<'_, C>, eoc: u16) {
        self.chip.set(INT1SEL, eoc);
        self.chip.set(INT1E, 1);
    }

    /// Pulse the interrupt one cycle before the result latches.
    pub fn set_late_interrupt_pulse(&self, _: &Eallow<'_, C>) {
        self.chip.set(INTPULSEPOS, 1);
    }

    pub fn force_soc0(&self) {
        self.chip.write(ADCSOCFRC1, SOC0);
    }

    pub fn result0(&self) -> u16 {
        self.chip.read(ADCRESULT0)
    }

    pub fn int1_pending(&self) -> bool {
        self.chip.read(ADCINTFLG) & ADCINT1 != 0
    }

    pub fn clear_int1(&self) {
        self.chip.write(ADCINTFLGCLR, ADCINT1);
    }
}
