// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Peripheral interrupt expansion (PIE) control registers.
//!
//! Twelve groups of eight interrupts each feed CPU interrupt lines INT1..INT12.
//! Taking an interrupt sets the group's PIEACK bit, which blocks every other
//! interrupt of that group until software writes the bit back.

use core::ops::Range;

use super::{Chip, Field};

pub const CTRL_BASE: u32 = 0x0CE0;
pub const VECTOR_BASE: u32 = 0x0D00;
pub const VECTOR_REGION: Range<u32> = VECTOR_BASE..VECTOR_BASE + 0x100;

pub const PIECTRL: u32 = CTRL_BASE;
pub const PIEACK: u32 = CTRL_BASE + 0x01;

pub const ENPIE: Field = Field::bit(PIECTRL, 0);

pub const GROUPS: usize = 12;
pub const SLOTS: usize = 8;

/// PIEIERx for group `group` (1-based).
pub const fn pieier(group: u8) -> u32 {
    CTRL_BASE + 0x02 + 2 * (group as u32 - 1)
}

/// PIEIFRx for group `group` (1-based).
pub const fn pieifr(group: u8) -> u32 {
    CTRL_BASE + 0x03 + 2 * (group as u32 - 1)
}

/// PIEACK bit for group `group` (1-based).
pub const fn ack_mask(group: u8) -> u16 {
    1 << (group - 1)
}

/// INTx bit for slot `slot` (1-based) within a group register.
pub const fn slot_mask(slot: u8) -> u16 {
    1 << (slot - 1)
}

pub struct PieCtrl<'a, C: Chip> {
    chip: &'a C,
}

impl<'a, C: Chip> PieCtrl<'a, C> {
    pub fn new(chip: &'a C) -> Self {
        Self { chip }
    }

    /// Fetch handlers from the PIE vector table instead of the boot ROM table.
    pub fn enable_vector_fetch(&self) {
        self.chip.set(ENPIE, 1);
    }

    pub fn enable(&self, group: u8, slot: u8) {
        let addr = pieier(group);
        self.chip.write(addr, self.chip.read(addr) | slot_mask(slot));
    }

    /// Re-open `group` for the next interrupt. PIEACK is write-one-to-clear.
    pub fn acknowledge(&self, group: u8) {
        self.chip.write(PIEACK, ack_mask(group));
    }
}
