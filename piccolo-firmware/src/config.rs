// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Compile-time configuration. There is no runtime configuration.

/// External oscillator feeding the PLL.
pub const OSC_CLK_HZ: u32 = 10_000_000;
/// PLLCR.DIV value: SYSCLK = OSCCLK * 9 before the output divider.
pub const PLL_MULTIPLIER: u16 = 9;
/// PLLSTS.DIVSEL value: 3 selects divide by 1.
pub const PLL_DIVSEL: u16 = 3;
/// Resulting system clock, used by every frequency calculation.
pub const SYSCLK_HZ: u32 = 90_000_000;

const _: () = assert!(crate::clock::sysclk_hz(OSC_CLK_HZ, PLL_MULTIPLIER, PLL_DIVSEL) == SYSCLK_HZ);

/// CPU timer 0 interrupt rate.
pub const TIMER_TICK_HZ: u32 = 100_000;
/// ePWM1 output frequency.
pub const PWM_FREQ_HZ: u32 = 1_000;

/// Duty cycle while the button is held.
pub const DUTY_PRESSED_PERCENT: u32 = 10;
/// Duty cycle while the button is released.
pub const DUTY_RELEASED_PERCENT: u32 = 90;

/// Number of entries in the circular sample buffer.
pub const SAMPLE_COUNT: usize = 1000;

/// Analog settle time after powering up the ADC.
pub const ADC_SETTLE_US: u32 = 1_000;
/// SOC0 acquisition window: 7 ADC clocks, above the 80 ns hold time.
pub const ADC_ACQPS: u16 = 6;
/// SOC0 input channel (ADCINA0).
pub const ADC_CHANNEL: u16 = 0;
/// Stall after enabling a peripheral clock.
pub const CLOCK_SETTLE_CYCLES: u32 = 2;

// Flash controller timing
pub const FLASH_PWR_ACTIVE: u16 = 3;
pub const FLASH_RANDOM_WAIT: u16 = 2;
pub const FLASH_PAGE_WAIT: u16 = 2;
/// `RPT #6 || NOP` after touching the flash configuration.
pub const FLASH_PIPELINE_FLUSH_CYCLES: u32 = 7;

// Watchdog
pub const WDKEY_ARM: u16 = 0x55;
pub const WDKEY_RESET: u16 = 0xAA;
/// WDCHK = 101, WDDIS set.
pub const WDCR_DISABLE: u16 = 0x0068;
/// WDCHK = 101, WDDIS clear, WDPS = /1.
pub const WDCR_ENABLE: u16 = 0x0028;

// Pin assignment
/// LED1..LED4 (active low). GPIO0 is later muxed to EPWM1A.
pub const LED_PINS: [u8; 4] = [0, 1, 2, 3];
/// Push button 3, reads high while pressed.
pub const BUTTON_PIN: u8 = 12;
/// ePWM1A output pin.
pub const PWM_OUTPUT_PIN: u8 = 0;
/// Auxiliary PWM reset line.
pub const PWM_RESET_PIN: u8 = 32;
