// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! GPIO control (protected) and data (unprotected) registers for ports A and B.
//!
//! Port registers are 32 bits wide; pin `n` of a port lives in word `n / 16`
//! at bit `n % 16`. Mux registers use two bits per pin.

use core::ops::Range;

use super::{Chip, Eallow, Field};

pub const CTRL_BASE: u32 = 0x6F80;
pub const CTRL_REGION: Range<u32> = CTRL_BASE..CTRL_BASE + 0x40;
pub const DATA_BASE: u32 = 0x6FC0;

pub const GPAMUX1: u32 = CTRL_BASE + 0x06;
pub const GPADIR: u32 = CTRL_BASE + 0x0A;
pub const GPAPUD: u32 = CTRL_BASE + 0x0C;
pub const GPBMUX1: u32 = CTRL_BASE + 0x16;
pub const GPBDIR: u32 = CTRL_BASE + 0x1A;
pub const GPBPUD: u32 = CTRL_BASE + 0x1C;

pub const GPADAT: u32 = DATA_BASE;
pub const GPASET: u32 = DATA_BASE + 0x02;
pub const GPACLEAR: u32 = DATA_BASE + 0x04;
pub const GPATOGGLE: u32 = DATA_BASE + 0x06;
pub const GPBDAT: u32 = DATA_BASE + 0x08;
pub const GPBSET: u32 = DATA_BASE + 0x0A;
pub const GPBCLEAR: u32 = DATA_BASE + 0x0C;
pub const GPBTOGGLE: u32 = DATA_BASE + 0x0E;

/// Offset of port B control registers from port A.
const PORT_B_CTRL: u32 = GPBMUX1 - GPAMUX1;
/// Offset of port B data registers from port A.
const PORT_B_DATA: u32 = GPBDAT - GPADAT;

/// Mux function 0 is always plain GPIO.
pub const MUX_GPIO: u16 = 0;
/// Function 1 on GPIO0 is EPWM1A.
pub const MUX_EPWM1A: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// Register word and bit for `pin` in the port A register `port_a_reg`.
fn locate(port_a_reg: u32, port_b_offset: u32, pin: u8) -> (u32, u8) {
    let (offset, index) = if pin < 32 {
        (0, pin)
    } else {
        (port_b_offset, pin - 32)
    };
    (port_a_reg + offset + (index / 16) as u32, index % 16)
}

pub fn mux_field(pin: u8) -> Field {
    let (offset, index) = if pin < 32 {
        (0, pin)
    } else {
        (PORT_B_CTRL, pin - 32)
    };
    Field::new(GPAMUX1 + offset + (index / 8) as u32, (index % 8) * 2, 2)
}

pub fn dir_field(pin: u8) -> Field {
    let (addr, bit) = locate(GPADIR, PORT_B_CTRL, pin);
    Field::bit(addr, bit)
}

pub fn pud_field(pin: u8) -> Field {
    let (addr, bit) = locate(GPAPUD, PORT_B_CTRL, pin);
    Field::bit(addr, bit)
}

pub fn dat_field(pin: u8) -> Field {
    let (addr, bit) = locate(GPADAT, PORT_B_DATA, pin);
    Field::bit(addr, bit)
}

/// Word address and mask for a write-one strobe register (SET/CLEAR/TOGGLE).
pub fn strobe(port_a_reg: u32, pin: u8) -> (u32, u16) {
    let (addr, bit) = locate(port_a_reg, PORT_B_DATA, pin);
    (addr, 1 << bit)
}

pub struct Gpio<'a, C: Chip> {
    chip: &'a C,
}

impl<'a, C: Chip> Gpio<'a, C> {
    pub fn new(chip: &'a C) -> Self {
        Self { chip }
    }

    pub fn set_mux(&self, _: &Eallow<'_, C>, pin: u8, function: u16) {
        self.chip.set(mux_field(pin), function);
    }

    pub fn set_direction(&self, _: &Eallow<'_, C>, pin: u8, direction: Direction) {
        self.chip.set(dir_field(pin), (direction == Direction::Output) as u16);
    }

    /// GPxPUD bits disable the internal pull-up when set.
    pub fn set_pullup(&self, _: &Eallow<'_, C>, pin: u8, enabled: bool) {
        self.chip.set(pud_field(pin), !enabled as u16);
    }

    pub fn set_high(&self, pin: u8) {
        let (addr, mask) = strobe(GPASET, pin);
        self.chip.write(addr, mask);
    }

    pub fn set_low(&self, pin: u8) {
        let (addr, mask) = strobe(GPACLEAR, pin);
        self.chip.write(addr, mask);
    }

    pub fn toggle(&self, pin: u8) {
        let (addr, mask) = strobe(GPATOGGLE, pin);
        self.chip.write(addr, mask);
    }

    pub fn is_high(&self, pin: u8) -> bool {
        self.chip.get(dat_field(pin)) == 1
    }
}
