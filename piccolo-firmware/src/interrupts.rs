// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! PIE vector table and interrupt enabling.

use crate::hw::pie::{GROUPS, SLOTS};
use crate::hw::{Chip, Eallow};
use crate::isr;
use crate::state::SharedState;

/// Interrupt service routine: runs with the chip and the shared state.
pub type Isr<C> = fn(&C, &SharedState);

/// Interrupt sources this firmware uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptId {
    /// ADC interrupt 1, PIE 1.1
    AdcInt1,
    /// CPU timer 0, PIE 1.7
    TInt0,
}

impl InterruptId {
    pub const ALL: [InterruptId; 2] = [InterruptId::AdcInt1, InterruptId::TInt0];

    /// PIE group, 1-based. Also the CPU interrupt line.
    pub const fn group(self) -> u8 {
        match self {
            InterruptId::AdcInt1 | InterruptId::TInt0 => 1,
        }
    }

    /// INTx slot within the group, 1-based.
    pub const fn slot(self) -> u8 {
        match self {
            InterruptId::AdcInt1 => 1,
            InterruptId::TInt0 => 7,
        }
    }

    pub fn from_slot(group: u8, slot: u8) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.group() == group && id.slot() == slot)
    }
}

/// PIE vector table: one handler per group/slot.
pub struct VectorTable<C> {
    entries: [[Option<Isr<C>>; SLOTS]; GROUPS],
}

impl<C: Chip> VectorTable<C> {
    pub const fn new() -> Self {
        Self {
            entries: [[None; SLOTS]; GROUPS],
        }
    }

    /// The vector table is EALLOW protected.
    pub fn register(&mut self, _: &Eallow<'_, C>, id: InterruptId, isr: Isr<C>) {
        self.entries[id.group() as usize - 1][id.slot() as usize - 1] = Some(isr);
    }

    pub fn get(&self, id: InterruptId) -> Option<Isr<C>> {
        self.entries[id.group() as usize - 1][id.slot() as usize - 1]
    }
}

impl<C: Chip> Default for VectorTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Install both handlers and open CPU interrupt line INT1.
pub fn init<C: Chip>(chip: &C, eallow: &Eallow<'_, C>, vectors: &mut VectorTable<C>) {
    let pie = chip.pie();

    pie.enable_vector_fetch();
    vectors.register(eallow, InterruptId::TInt0, isr::timer_tick::<C>);
    vectors.register(eallow, InterruptId::AdcInt1, isr::adc_complete::<C>);

    for id in InterruptId::ALL {
        pie.enable(id.group(), id.slot());
    }

    chip.set_ier(1 << (InterruptId::TInt0.group() - 1));
    chip.enable_interrupts();
}
