// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Watchdog control and servicing.

use crate::config::{WDCR_DISABLE, WDCR_ENABLE, WDKEY_ARM, WDKEY_RESET};
use crate::hw::{Chip, Eallow};

/// Stop the watchdog so initialization may take arbitrarily long.
pub fn disable<C: Chip>(chip: &C, eallow: &Eallow<'_, C>) {
    chip.sysctrl().write_watchdog_control(eallow, WDCR_DISABLE);
}

pub fn enable<C: Chip>(chip: &C, eallow: &Eallow<'_, C>) {
    chip.sysctrl().write_watchdog_control(eallow, WDCR_ENABLE);
}

/// Re-key the watchdog counter. Both keys are always written, in order.
pub fn service<C: Chip>(chip: &C) {
    let eallow = chip.eallow();
    let sysctrl = chip.sysctrl();
    sysctrl.write_watchdog_key(&eallow, WDKEY_ARM);
    sysctrl.write_watchdog_key(&eallow, WDKEY_RESET);
}
