// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Host-side simulation of the chip and of the interrupt-driven main loop.
//!
//! [`SimChip`] implements [`Chip`](crate::hw::Chip), so the firmware runs on
//! it unchanged. [`Simulation`] plays the CPU: it interleaves idle-loop passes
//! with whatever interrupts the PIE would accept, saving and clearing EALLOW
//! around each handler as the interrupt context save does.

mod chip;
mod delay;

pub use chip::{SimChip, SimStats, ADC_FULL_SCALE, CONVERSION_CYCLES, DEFAULT_PLL_LOCK_POLLS};
pub use delay::SimDelay;

use crate::boot::RamFuncLayout;
use crate::error::{Error, Result};
use crate::firmware::Firmware;
use crate::hw::Chip;
use crate::interrupts::InterruptId;
use crate::state::SharedState;

/// Cycles one idle-loop pass takes (EALLOW, two key writes, EDIS, branch).
pub const IDLE_LOOP_CYCLES: u32 = 12;
/// Cycles charged for each handler, including context save and restore.
pub const ISR_CYCLES: u32 = 60;

pub struct Simulation<'a> {
    firmware: Firmware<'a, SimChip>,
    ticks: u64,
    conversions_handled: u64,
}

impl<'a> Simulation<'a> {
    /// Boot the firmware with the default RAM function layout.
    pub fn boot(chip: &'a SimChip, state: &'a SharedState) -> Result<Self> {
        Self::boot_with_layout(chip, state, &RamFuncLayout::DEFAULT)
    }

    pub fn boot_with_layout(
        chip: &'a SimChip,
        state: &'a SharedState,
        layout: &RamFuncLayout,
    ) -> Result<Self> {
        let mut delay = SimDelay::new(chip);
        let firmware = Firmware::boot(chip, state, &mut delay, layout)?;
        Ok(Self {
            firmware,
            ticks: 0,
            conversions_handled: 0,
        })
    }

    /// One idle-loop pass followed by every interrupt that becomes deliverable.
    pub fn step(&mut self) -> Result<()> {
        let chip = self.firmware.chip();
        self.firmware.idle_once();
        chip.advance(IDLE_LOOP_CYCLES);
        self.service_interrupts()?;
        if chip.take_reset() {
            return Err(Error::WatchdogReset);
        }
        Ok(())
    }

    /// Step until `count` more timer ticks have been handled.
    pub fn run_ticks(&mut self, count: u64) -> Result<()> {
        let target = self.ticks + count;
        while self.ticks < target {
            self.step()?;
        }
        Ok(())
    }

    /// Step until at least `cycles` more CPU cycles have elapsed.
    pub fn run_cycles(&mut self, cycles: u64) -> Result<()> {
        let chip = self.firmware.chip();
        let target = chip.stats().cycles + cycles;
        while chip.stats().cycles < target {
            self.step()?;
        }
        Ok(())
    }

    fn service_interrupts(&mut self) -> Result<()> {
        let chip = self.firmware.chip();
        while let Some(id) = chip.accept_interrupt() {
            let saved = chip.set_eallow(false);
            let result = self.firmware.dispatch(id);
            chip.set_eallow(saved);
            result?;

            match id {
                InterruptId::TInt0 => self.ticks += 1,
                InterruptId::AdcInt1 => self.conversions_handled += 1,
            }
            chip.advance(ISR_CYCLES);
        }
        Ok(())
    }

    /// Timer handler invocations so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// ADC handler invocations so far.
    pub fn conversions_handled(&self) -> u64 {
        self.conversions_handled
    }

    pub fn chip(&self) -> &'a SimChip {
        self.firmware.chip()
    }

    pub fn state(&self) -> &'a SharedState {
        self.firmware.state()
    }

    pub fn firmware(&self) -> &Firmware<'a, SimChip> {
        &self.firmware
    }

    pub fn firmware_mut(&mut self) -> &mut Firmware<'a, SimChip> {
        &mut self.firmware
    }
}
