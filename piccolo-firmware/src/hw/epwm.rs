// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! ePWM1 time base, compare, action qualifier and event trigger registers.

use super::{Chip, Field};

pub const BASE: u32 = 0x6800;

pub const TBCTL: u32 = BASE;
pub const TBCTR: u32 = BASE + 0x04;
pub const TBPRD: u32 = BASE + 0x05;
pub const CMPA: u32 = BASE + 0x09;
pub const CMPB: u32 = BASE + 0x0A;
pub const AQCTLA: u32 = BASE + 0x0B;
pub const AQCTLB: u32 = BASE + 0x0C;
pub const ETSEL: u32 = BASE + 0x19;
pub const ETPS: u32 = BASE + 0x1A;

pub const CTRMODE: Field = Field::new(TBCTL, 0, 2);
pub const HSPCLKDIV: Field = Field::new(TBCTL, 7, 3);
pub const CLKDIV: Field = Field::new(TBCTL, 10, 3);

pub const SOCASEL: Field = Field::new(ETSEL, 8, 3);
pub const SOCAEN: Field = Field::bit(ETSEL, 11);
pub const SOCAPRD: Field = Field::new(ETPS, 8, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum CounterMode {
    Up = 0,
    Down = 1,
    UpDown = 2,
}

/// Action qualifier output action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Action {
    Nothing = 0,
    Clear = 1,
    Set = 2,
    Toggle = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    A,
    B,
}

impl Output {
    fn aqctl(self) -> u32 {
        match self {
            Output::A => AQCTLA,
            Output::B => AQCTLB,
        }
    }

    /// Counter equals CMPA while counting up.
    pub fn cau(self) -> Field {
        Field::new(self.aqctl(), 4, 2)
    }

    /// Counter equals CMPA while counting down.
    pub fn cad(self) -> Field {
        Field::new(self.aqctl(), 6, 2)
    }
}

/// ETSEL[SOCASEL] event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum SocEvent {
    CounterZero = 1,
    CounterPeriod = 2,
}

pub struct EPwm1<'a, C: Chip> {
    chip: &'a C,
}

impl<'a, C: Chip> EPwm1<'a, C> {
    pub fn new(chip: &'a C) -> Self {
        Self { chip }
    }

    pub fn set_counter_mode(&self, mode: CounterMode) {
        self.chip.set(CTRMODE, mode as u16);
    }

    pub fn set_period(&self, period: u16) {
        self.chip.write(TBPRD, period);
    }

    pub fn period(&self) -> u16 {
        self.chip.read(TBPRD)
    }

    /// TBCLK = SYSCLK / (HSPCLKDIV * CLKDIV), both given as register codes.
    pub fn set_clock_dividers(&self, hspclkdiv: u16, clkdiv: u16) {
        self.chip.set(HSPCLKDIV, hspclkdiv);
        self.chip.set(CLKDIV, clkdiv);
    }

    /// Actions taken when the counter crosses CMPA in each direction.
    pub fn set_compare_actions(&self, output: Output, counting_up: Action, counting_down: Action) {
        self.chip.set(output.cau(), counting_up as u16);
        self.chip.set(output.cad(), counting_down as u16);
    }

    /// Generate EPWMxSOCA on every `event`.
    pub fn enable_soc_a(&self, event: SocEvent) {
        self.chip.set(SOCASEL, event as u16);
        self.chip.set(SOCAEN, 1);
        self.chip.set(SOCAPRD, 1);
    }

    pub fn set_compare_a(&self, value: u16) {
        self.chip.write(CMPA, value);
    }

    pub fn compare_a(&self) -> u16 {
        self.chip.read(CMPA)
    }
}
