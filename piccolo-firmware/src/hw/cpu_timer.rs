// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! CPU timer 0. Not EALLOW protected.

use super::{Chip, Field};

pub const BASE: u32 = 0x0C00;

pub const TIM: u32 = BASE;
pub const PRD: u32 = BASE + 0x02;
pub const TCR: u32 = BASE + 0x04;
pub const TPR: u32 = BASE + 0x06;
pub const TPRH: u32 = BASE + 0x07;

pub const TSS: Field = Field::bit(TCR, 4);
pub const TRB: Field = Field::bit(TCR, 5);
pub const TIE: Field = Field::bit(TCR, 14);
pub const TIF: Field = Field::bit(TCR, 15);
pub const TDDR: Field = Field::new(TPR, 0, 8);
pub const TDDRH: Field = Field::new(TPRH, 0, 8);

pub struct CpuTimer0<'a, C: Chip> {
    chip: &'a C,
}

impl<'a, C: Chip> CpuTimer0<'a, C> {
    pub fn new(chip: &'a C) -> Self {
        Self { chip }
    }

    pub fn set_period(&self, period: u32) {
        self.chip.write32(PRD, period);
    }

    pub fn period(&self) -> u32 {
        self.chip.read32(PRD)
    }

    /// 16-bit prescaler split across TDDRH:TDDR.
    pub fn set_prescaler(&self, prescale: u16) {
        self.chip.set(TDDRH, prescale >> 8);
        self.chip.set(TDDR, prescale & 0xFF);
    }

    pub fn stop(&self) {
        self.chip.set(TSS, 1);
    }

    pub fn start(&self) {
        self.chip.set(TSS, 0);
    }

    pub fn is_running(&self) -> bool {
        self.chip.get(TSS) == 0
    }

    /// Load TIM from PRD and the prescaler counter from TDDRH:TDDR.
    pub fn reload(&self) {
        self.chip.set(TRB, 1);
    }

    pub fn enable_interrupt(&self) {
        self.chip.set(TIE, 1);
    }
}
