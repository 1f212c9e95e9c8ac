// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

use crate::interrupts::InterruptId;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// RAM function load region not in flash, or run region not in RAM
    RelocationOutOfRange,
    /// CRC-32 of the relocated image differs from the flash image
    RelocationMismatch { expected: u32, actual: u32 },
    /// Interrupt accepted with no registered vector
    UnhandledInterrupt(InterruptId),
    /// Watchdog expired (reported by the simulator)
    WatchdogReset,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::RelocationOutOfRange => write!(f, "RAM function layout out of range"),
            Error::RelocationMismatch { expected, actual } => write!(
                f,
                "RAM function copy mismatch: expected CRC 0x{:08x}, got 0x{:08x}",
                expected, actual
            ),
            Error::UnhandledInterrupt(id) => write!(f, "no vector registered for {:?}", id),
            Error::WatchdogReset => write!(f, "watchdog reset"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
