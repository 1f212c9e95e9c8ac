// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Boot sequence and idle loop.

use embedded_hal::delay::DelayNs;

use crate::boot::{self, RamFuncLayout};
use crate::error::{Error, Result};
use crate::gpio::{self, Led, Pin};
use crate::hw::Chip;
use crate::interrupts::{self, InterruptId, VectorTable};
use crate::state::SharedState;
use crate::{adc, clock, pwm, timer, watchdog};

/// The running firmware: configured peripherals plus the installed vectors.
pub struct Firmware<'a, C: Chip> {
    chip: &'a C,
    state: &'a SharedState,
    vectors: VectorTable<C>,
    leds: [Led<Pin<'a, C>>; 4],
}

impl<'a, C: Chip> Firmware<'a, C> {
    /// Bring up the chip and start the sampling tick.
    ///
    /// The timer is started last, after EALLOW has been dropped, so no tick can
    /// arrive before its handler, the ADC and the PWM are ready.
    pub fn boot<D: DelayNs>(
        chip: &'a C,
        state: &'a SharedState,
        delay: &mut D,
        layout: &RamFuncLayout,
    ) -> Result<Self> {
        let ram_funcs = boot::relocate(chip, layout)?;
        boot::configure_flash(chip, &ram_funcs);

        let mut vectors = VectorTable::new();
        let leds = {
            let eallow = chip.eallow();

            watchdog::disable(chip, &eallow);
            let leds = gpio::init(chip, &eallow);
            clock::init(chip, &eallow);
            timer::init(chip);
            interrupts::init(chip, &eallow, &mut vectors);
            adc::init(chip, &eallow, delay);
            let _tbprd = pwm::init(chip, &eallow, state);
            watchdog::enable(chip, &eallow);

            #[cfg(feature = "defmt")]
            defmt::info!("Peripherals configured, TBPRD = {}", _tbprd);

            leds
        };

        timer::start(chip);

        #[cfg(feature = "defmt")]
        defmt::info!("Sampling tick started");

        Ok(Self {
            chip,
            state,
            vectors,
            leds,
        })
    }

    /// One pass of the idle loop.
    pub fn idle_once(&self) {
        watchdog::service(self.chip);
    }

    /// Idle forever; all functional work happens in interrupts.
    pub fn run(self) -> ! {
        loop {
            self.idle_once();
        }
    }

    /// Run the handler installed for `id`.
    pub fn dispatch(&self, id: InterruptId) -> Result<()> {
        match self.vectors.get(id) {
            Some(isr) => {
                isr(self.chip, self.state);
                Ok(())
            }
            None => {
                #[cfg(feature = "defmt")]
                defmt::warn!("No vector for {:?}", id);
                Err(Error::UnhandledInterrupt(id))
            }
        }
    }

    pub fn chip(&self) -> &'a C {
        self.chip
    }

    pub fn state(&self) -> &'a SharedState {
        self.state
    }

    pub fn leds_mut(&mut self) -> &mut [Led<Pin<'a, C>>; 4] {
        &mut self.leds
    }
}
