// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Board LEDs and push button on top of `embedded-hal` pin traits.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::config::{BUTTON_PIN, LED_PINS};
use crate::hw::gpio::Direction;
use crate::hw::{Chip, Eallow};

/// One GPIO pin driven through the SET/CLEAR strobes and read through GPxDAT.
pub struct Pin<'a, C: Chip> {
    chip: &'a C,
    pin: u8,
}

impl<'a, C: Chip> Pin<'a, C> {
    pub fn new(chip: &'a C, pin: u8) -> Self {
        Self { chip, pin }
    }

    pub fn number(&self) -> u8 {
        self.pin
    }
}

impl<C: Chip> ErrorType for Pin<'_, C> {
    type Error = Infallible;
}

impl<C: Chip> OutputPin for Pin<'_, C> {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.chip.gpio().set_high(self.pin);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.chip.gpio().set_low(self.pin);
        Ok(())
    }
}

impl<C: Chip> InputPin for Pin<'_, C> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.chip.gpio().is_high(self.pin))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.chip.gpio().is_high(self.pin))
    }
}

/// Active-low LED that remembers its last commanded state.
pub struct Led<PIN: OutputPin> {
    pin: PIN,
    is_on: bool,
}

impl<PIN: OutputPin> Led<PIN> {
    /// Wrap `pin` and switch the LED off.
    pub fn new(mut pin: PIN) -> Self {
        pin.set_high().ok();
        Self { pin, is_on: false }
    }

    pub fn set(&mut self, on: bool) {
        if on {
            self.pin.set_low().ok();
        } else {
            self.pin.set_high().ok();
        }
        self.is_on = on;
    }

    #[inline]
    pub fn on(&mut self) {
        self.set(true);
    }

    #[inline]
    pub fn off(&mut self) {
        self.set(false);
    }

    pub fn toggle(&mut self) {
        self.set(!self.is_on);
    }

    #[inline]
    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn free(self) -> PIN {
        self.pin
    }
}

/// Push button 3. Reads high while pressed.
pub struct Button<'a, C: Chip> {
    pin: Pin<'a, C>,
}

impl<'a, C: Chip> Button<'a, C> {
    pub fn new(chip: &'a C) -> Self {
        Self {
            pin: Pin::new(chip, BUTTON_PIN),
        }
    }

    pub fn is_pressed(&mut self) -> bool {
        matches!(self.pin.is_high(), Ok(true))
    }
}

/// Set up the four LEDs as outputs, all off, and the button as an input.
///
/// The board has external pull-ups on these lines, so the internal ones are
/// disabled.
pub fn init<'a, C: Chip>(chip: &'a C, eallow: &Eallow<'_, C>) -> [Led<Pin<'a, C>>; 4] {
    let gpio = chip.gpio();

    for pin in LED_PINS.iter().copied().chain([BUTTON_PIN]) {
        gpio.set_pullup(eallow, pin, false);
    }
    for pin in LED_PINS {
        gpio.set_direction(eallow, pin, Direction::Output);
    }
    let leds = LED_PINS.map(|pin| Led::new(Pin::new(chip, pin)));
    gpio.set_direction(eallow, BUTTON_PIN, Direction::Input);
    leds
}
