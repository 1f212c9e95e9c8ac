// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Register capability layer.
//!
//! The C28x data space is word addressed and every register is 16 bits wide;
//! 32-bit registers occupy two consecutive words, low word first. [`Chip`] is
//! the only way firmware code touches hardware. Each peripheral gets a typed
//! accessor (`chip.sysctrl()`, `chip.epwm1()`, ...) whose protected setters
//! demand an [`Eallow`] guard as proof that EALLOW is set.

use core::ops::Range;

pub mod adc;
pub mod cpu_timer;
pub mod epwm;
pub mod flash;
pub mod gpio;
pub mod pie;
pub mod sysctrl;

pub use adc::AdcRegs;
pub use cpu_timer::CpuTimer0;
pub use epwm::EPwm1;
pub use flash::FlashRegs;
pub use gpio::Gpio;
pub use pie::PieCtrl;
pub use sysctrl::SysCtrl;

/// M0 and M1 SARAM.
pub const M0M1_RAM: Range<u32> = 0x0000..0x0800;
/// L0 SARAM, where RAM functions run.
pub const L0_RAM: Range<u32> = 0x8000..0x9000;
/// On-chip flash.
pub const FLASH: Range<u32> = 0x3F_0000..0x3F_8000;

/// Register frames guarded by EALLOW.
const PROTECTED: [Range<u32>; 5] = [
    flash::REGION,
    pie::VECTOR_REGION,
    gpio::CTRL_REGION,
    sysctrl::REGION,
    adc::REGION,
];

/// Registers inside a protected frame that are writable without EALLOW.
const UNPROTECTED: [u32; 2] = [adc::ADCINTFLGCLR, adc::ADCSOCFRC1];

pub fn is_ram(addr: u32) -> bool {
    M0M1_RAM.contains(&addr) || L0_RAM.contains(&addr)
}

pub fn is_flash(addr: u32) -> bool {
    FLASH.contains(&addr)
}

/// Whether a write to `addr` is ignored unless EALLOW is set.
pub fn is_protected(addr: u32) -> bool {
    PROTECTED.iter().any(|r| r.contains(&addr)) && !UNPROTECTED.contains(&addr)
}

/// A bit field inside one 16-bit register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub addr: u32,
    pub shift: u8,
    pub width: u8,
}

impl Field {
    pub const fn new(addr: u32, shift: u8, width: u8) -> Self {
        Self { addr, shift, width }
    }

    pub const fn bit(addr: u32, bit: u8) -> Self {
        Self::new(addr, bit, 1)
    }

    pub const fn mask(&self) -> u16 {
        (((1u32 << self.width) - 1) << self.shift) as u16
    }
}

/// Access to the CPU core and the peripheral register space.
///
/// Methods take `&self`: registers are shared between the main path and
/// interrupt handlers, exactly as memory-mapped hardware is.
pub trait Chip {
    fn read(&self, addr: u32) -> u16;

    fn write(&self, addr: u32, value: u16);

    /// Set or clear ST1.EALLOW, returning the previous state.
    fn set_eallow(&self, allow: bool) -> bool;

    /// Load the CPU interrupt enable register.
    fn set_ier(&self, mask: u16);

    /// `EINT`: clear INTM so enabled interrupts reach the CPU.
    fn enable_interrupts(&self);

    /// Stall for `cycles` CPU cycles (`RPT #n || NOP`).
    fn spin(&self, cycles: u32);

    fn read32(&self, addr: u32) -> u32 {
        self.read(addr) as u32 | (self.read(addr + 1) as u32) << 16
    }

    fn write32(&self, addr: u32, value: u32) {
        self.write(addr, value as u16);
        self.write(addr + 1, (value >> 16) as u16);
    }

    fn get(&self, field: Field) -> u16 {
        (self.read(field.addr) & field.mask()) >> field.shift
    }

    /// Read-modify-write of a single field.
    fn set(&self, field: Field, value: u16) {
        let mask = field.mask();
        let word = self.read(field.addr) & !mask;
        let bits = ((value as u32) << field.shift) as u16 & mask;
        self.write(field.addr, word | bits);
    }

    fn eallow(&self) -> Eallow<'_, Self>
    where
        Self: Sized,
    {
        Eallow::new(self)
    }

    fn flash(&self) -> FlashRegs<'_, Self>
    where
        Self: Sized,
    {
        FlashRegs::new(self)
    }

    fn sysctrl(&self) -> SysCtrl<'_, Self>
    where
        Self: Sized,
    {
        SysCtrl::new(self)
    }

    fn cpu_timer0(&self) -> CpuTimer0<'_, Self>
    where
        Self: Sized,
    {
        CpuTimer0::new(self)
    }

    fn adc(&self) -> AdcRegs<'_, Self>
    where
        Self: Sized,
    {
        AdcRegs::new(self)
    }

    fn epwm1(&self) -> EPwm1<'_, Self>
    where
        Self: Sized,
    {
        EPwm1::new(self)
    }

    fn gpio(&self) -> Gpio<'_, Self>
    where
        Self: Sized,
    {
        Gpio::new(self)
    }

    fn pie(&self) -> PieCtrl<'_, Self>
    where
        Self: Sized,
    {
        PieCtrl::new(self)
    }
}

/// Scoped EALLOW.
///
/// Acquiring sets EALLOW; dropping restores whatever state was active before,
/// so an inner guard never revokes access an outer guard still relies on.
#[must_use = "EALLOW is revoked as soon as the guard is dropped"]
pub struct Eallow<'a, C: Chip> {
    chip: &'a C,
    restore: bool,
}

impl<'a, C: Chip> Eallow<'a, C> {
    pub fn new(chip: &'a C) -> Self {
        let restore = chip.set_eallow(true);
        Self { chip, restore }
    }
}

impl<C: Chip> Drop for Eallow<'_, C> {
    fn drop(&mut self) {
        self.chip.set_eallow(self.restore);
    }
}
