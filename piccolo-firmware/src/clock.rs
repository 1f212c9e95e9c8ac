// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! PLL configuration.

use crate::config::{PLL_DIVSEL, PLL_MULTIPLIER};
use crate::hw::{Chip, Eallow};

/// SYSCLK for a PLLCR.DIV / PLLSTS.DIVSEL pair. DIV = 0 bypasses the PLL.
pub const fn sysclk_hz(osc_hz: u32, multiplier: u16, divsel: u16) -> u32 {
    let divisor = match divsel {
        0 | 1 => 4,
        2 => 2,
        _ => 1,
    };
    let pll_hz = if multiplier == 0 {
        osc_hz
    } else {
        osc_hz * multiplier as u32
    };
    pll_hz / divisor
}

/// Multiply the oscillator up to `SYSCLK_HZ`.
///
/// Spins on PLLLOCKS with no timeout. A PLL that never locks hangs here until
/// the watchdog, if running, resets the chip.
pub fn init<C: Chip>(chip: &C, eallow: &Eallow<'_, C>) {
    let sysctrl = chip.sysctrl();

    // Missing-clock detection would trip while the PLL relocks
    sysctrl.set_missing_clock_detect(eallow, false);
    sysctrl.set_pll_multiplier(eallow, PLL_MULTIPLIER);
    while !sysctrl.pll_locked() {}
    sysctrl.set_missing_clock_detect(eallow, true);
    sysctrl.set_clock_divider(eallow, PLL_DIVSEL);

    #[cfg(feature = "defmt")]
    defmt::info!("PLL locked, SYSCLK = {} Hz", crate::config::SYSCLK_HZ);
}
