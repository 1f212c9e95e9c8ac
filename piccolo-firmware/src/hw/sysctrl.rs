// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! System control: PLL, peripheral clocks and watchdog.

use core::ops::Range;

use super::{Chip, Eallow, Field};

pub const BASE: u32 = 0x7010;
pub const REGION: Range<u32> = BASE..BASE + 0x20;

pub const PLLSTS: u32 = BASE + 0x01;
pub const PCLKCR0: u32 = BASE + 0x0C;
pub const PCLKCR1: u32 = BASE + 0x0D;
pub const PLLCR: u32 = BASE + 0x11;
pub const WDCNTR: u32 = BASE + 0x13;
pub const WDKEY: u32 = BASE + 0x15;
pub const WDCR: u32 = BASE + 0x19;

pub const PLLLOCKS: Field = Field::bit(PLLSTS, 0);
pub const MCLKOFF: Field = Field::bit(PLLSTS, 6);
pub const DIVSEL: Field = Field::new(PLLSTS, 7, 2);
pub const PLL_DIV: Field = Field::new(PLLCR, 0, 4);

pub const TBCLKSYNC: Field = Field::bit(PCLKCR0, 2);
pub const ADCENCLK: Field = Field::bit(PCLKCR0, 3);
pub const EPWM1ENCLK: Field = Field::bit(PCLKCR1, 0);

pub const WDPS: Field = Field::new(WDCR, 0, 3);
pub const WDCHK: Field = Field::new(WDCR, 3, 3);
pub const WDDIS: Field = Field::bit(WDCR, 6);

pub struct SysCtrl<'a, C: Chip> {
    chip: &'a C,
}

impl<'a, C: Chip> SysCtrl<'a, C> {
    pub fn new(chip: &'a C) -> Self {
        Self { chip }
    }

    pub fn set_missing_clock_detect(&self, _: &Eallow<'_, C>, enabled: bool) {
        self.chip.set(MCLKOFF, !enabled as u16);
    }

    pub fn set_pll_multiplier(&self, _: &Eallow<'_, C>, div: u16) {
        self.chip.set(PLL_DIV, div);
    }

    pub fn pll_locked(&self) -> bool {
        self.chip.get(PLLLOCKS) == 1
    }

    pub fn set_clock_divider(&self, _: &Eallow<'_, C>, divsel: u16) {
        self.chip.set(DIVSEL, divsel);
    }

    pub fn enable_adc_clock(&self, _: &Eallow<'_, C>) {
        self.chip.set(ADCENCLK, 1);
    }

    pub fn enable_epwm1_clock(&self, _: &Eallow<'_, C>) {
        self.chip.set(EPWM1ENCLK, 1);
    }

    pub fn set_tbclk_sync(&self, _: &Eallow<'_, C>, enabled: bool) {
        self.chip.set(TBCLKSYNC, enabled as u16);
    }

    /// WDCR is written whole: the WDCHK bits must read back 101 on every write.
    pub fn write_watchdog_control(&self, _: &Eallow<'_, C>, value: u16) {
        self.chip.write(WDCR, value);
    }

    pub fn write_watchdog_key(&self, _: &Eallow<'_, C>, key: u16) {
        self.chip.write(WDKEY, key);
    }
}
