// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

use embedded_hal::delay::DelayNs;

use super::SimChip;

/// Time source that advances the simulated clock instead of burning cycles.
pub struct SimDelay<'a> {
    chip: &'a SimChip,
    total_ns: u64,
}

impl<'a> SimDelay<'a> {
    pub fn new(chip: &'a SimChip) -> Self {
        Self { chip, total_ns: 0 }
    }

    /// Sum of every delay requested so far.
    pub fn total_ns(&self) -> u64 {
        self.total_ns
    }
}

impl DelayNs for SimDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
        self.chip.advance_ns(ns as u64);
    }
}
