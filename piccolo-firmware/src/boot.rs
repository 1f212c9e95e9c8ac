// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! RAM function relocation and flash controller timing.
//!
//! The flash wait states cannot be changed by code that is itself fetched
//! from flash, so the routine doing it is linked to run from L0 RAM and copied
//! there first. [`RamFuncs`] is the proof that the copy happened;
//! [`configure_flash`] cannot be called without it.

use crc::{Crc, CRC_32_ISO_HDLC};

use crate::config::{
    FLASH_PAGE_WAIT, FLASH_PIPELINE_FLUSH_CYCLES, FLASH_PWR_ACTIVE, FLASH_RANDOM_WAIT,
};
use crate::error::{Error, Result};
use crate::hw::{self, Chip};

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Where the `ramfuncs` section is stored and where it executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RamFuncLayout {
    pub load_start: u32,
    pub run_start: u32,
    /// Length in 16-bit words.
    pub size: u32,
}

impl RamFuncLayout {
    /// Layout produced by the flash linker command file.
    pub const DEFAULT: Self = Self {
        load_start: 0x3F_6000,
        run_start: 0x0000_8000,
        size: 0x0100,
    };

    fn is_valid(&self) -> bool {
        if self.size == 0 {
            return true;
        }
        let (Some(load_end), Some(run_end)) = (
            self.load_start.checked_add(self.size - 1),
            self.run_start.checked_add(self.size - 1),
        ) else {
            return false;
        };
        hw::is_flash(self.load_start)
            && hw::is_flash(load_end)
            && hw::is_ram(self.run_start)
            && hw::is_ram(run_end)
    }
}

impl Default for RamFuncLayout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// RAM functions are resident at their run address.
#[derive(Debug)]
pub struct RamFuncs {
    crc: u32,
}

impl RamFuncs {
    /// CRC-32 of the relocated image.
    pub fn crc(&self) -> u32 {
        self.crc
    }
}

/// CRC-32 over `size` words starting at `start`, little-endian byte order.
/// Stops at the end of the address space.
pub fn image_crc<C: Chip>(chip: &C, start: u32, size: u32) -> u32 {
    let mut digest = CRC32.digest();
    for addr in (start..=u32::MAX).take(size as usize) {
        digest.update(&chip.read(addr).to_le_bytes());
    }
    digest.finalize()
}

/// Copy the RAM function image from flash to its run address and verify it.
pub fn relocate<C: Chip>(chip: &C, layout: &RamFuncLayout) -> Result<RamFuncs> {
    if !layout.is_valid() {
        return Err(Error::RelocationOutOfRange);
    }

    for offset in 0..layout.size {
        let word = chip.read(layout.load_start + offset);
        chip.write(layout.run_start + offset, word);
    }

    let expected = image_crc(chip, layout.load_start, layout.size);
    let actual = image_crc(chip, layout.run_start, layout.size);
    if expected != actual {
        return Err(Error::RelocationMismatch { expected, actual });
    }

    #[cfg(feature = "defmt")]
    defmt::info!(
        "Relocated {} words 0x{:06x} -> 0x{:04x}",
        layout.size,
        layout.load_start,
        layout.run_start
    );

    Ok(RamFuncs { crc: actual })
}

/// Power the flash, set wait states and enable prefetch.
///
/// Runs from RAM; `_resident` proves the routine was relocated.
pub fn configure_flash<C: Chip>(chip: &C, _resident: &RamFuncs) {
    {
        let eallow = chip.eallow();
        let flash = chip.flash();
        flash.set_power_mode(&eallow, FLASH_PWR_ACTIVE);
        flash.set_wait_states(&eallow, FLASH_RANDOM_WAIT, FLASH_PAGE_WAIT);
        flash.enable_pipeline(&eallow);
    }
    // Let the pipeline drain before returning into flash
    chip.spin(FLASH_PIPELINE_FLUSH_CYCLES);
}
