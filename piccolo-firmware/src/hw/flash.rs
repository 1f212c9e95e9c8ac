// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Flash controller registers.

use core::ops::Range;

use super::{Chip, Eallow, Field};

pub const BASE: u32 = 0x0A80;
pub const REGION: Range<u32> = BASE..BASE + 0x60;

pub const FOPT: u32 = BASE;
pub const FPWR: u32 = BASE + 0x02;
pub const FBANKWAIT: u32 = BASE + 0x06;

pub const ENPIPE: Field = Field::bit(FOPT, 0);
pub const PWR: Field = Field::new(FPWR, 0, 2);
pub const RANDWAIT: Field = Field::new(FBANKWAIT, 0, 4);
pub const PAGEWAIT: Field = Field::new(FBANKWAIT, 8, 4);

pub struct FlashRegs<'a, C: Chip> {
    chip: &'a C,
}

impl<'a, C: Chip> FlashRegs<'a, C> {
    pub fn new(chip: &'a C) -> Self {
        Self { chip }
    }

    pub fn set_power_mode(&self, _: &Eallow<'_, C>, mode: u16) {
        self.chip.set(PWR, mode);
    }

    pub fn set_wait_states(&self, _: &Eallow<'_, C>, random: u16, page: u16) {
        self.chip.set(RANDWAIT, random);
        self.chip.set(PAGEWAIT, page);
    }

    pub fn enable_pipeline(&self, _: &Eallow<'_, C>) {
        self.chip.set(ENPIPE, 1);
    }
}
