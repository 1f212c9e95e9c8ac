// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Boot sequence tests against the simulated chip.

use piccolo_firmware::boot::{self, RamFuncLayout};
use piccolo_firmware::config::{BUTTON_PIN, LED_PINS, PWM_RESET_PIN, WDCR_ENABLE};
use piccolo_firmware::hw::{adc, cpu_timer, epwm, flash, gpio, pie, sysctrl, Chip};
use piccolo_firmware::sim::{SimChip, SimDelay, Simulation, DEFAULT_PLL_LOCK_POLLS};
use piccolo_firmware::{timer, Error, Firmware, SharedState};

fn ramfunc_image() -> Vec<u16> {
    (0..RamFuncLayout::DEFAULT.size as u16)
        .map(|i| i.wrapping_mul(0x9E37) ^ 0x5A5A)
        .collect()
}

fn booted_chip() -> (SimChip, SharedState) {
    let chip = SimChip::new();
    let state = SharedState::new();
    let mut delay = SimDelay::new(&chip);
    Firmware::boot(&chip, &state, &mut delay, &RamFuncLayout::DEFAULT).unwrap();
    (chip, state)
}

#[test]
fn test_ramfuncs_copied_to_run_address() {
    let chip = SimChip::new();
    let state = SharedState::new();
    let image = ramfunc_image();
    let layout = RamFuncLayout::DEFAULT;
    assert_eq!(chip.program_flash(layout.load_start, &image), image.len());

    Simulation::boot(&chip, &state).unwrap();

    for (offset, word) in image.iter().enumerate() {
        assert_eq!(chip.peek(layout.run_start + offset as u32), *word);
    }
}

#[test]
fn test_relocation_rejects_layout_outside_memory() {
    let chip = SimChip::new();
    let state = SharedState::new();

    let run_in_flash = RamFuncLayout {
        run_start: 0x3F_7000,
        ..RamFuncLayout::DEFAULT
    };
    let load_from_ram = RamFuncLayout {
        load_start: 0x0000_8000,
        ..RamFuncLayout::DEFAULT
    };
    let overrun = RamFuncLayout {
        run_start: 0x0000_8F80,
        ..RamFuncLayout::DEFAULT
    };
    let oversized = RamFuncLayout {
        size: u32::MAX,
        ..RamFuncLayout::DEFAULT
    };
    // run_start + size - 1 would wrap back to 0x8000
    let wrapping = RamFuncLayout {
        run_start: 0x0000_8002,
        size: u32::MAX,
        ..RamFuncLayout::DEFAULT
    };

    for layout in [run_in_flash, load_from_ram, overrun, oversized, wrapping] {
        assert_eq!(
            Simulation::boot_with_layout(&chip, &state, &layout).err(),
            Some(Error::RelocationOutOfRange)
        );
    }
}

#[test]
fn test_image_crc_stops_at_address_space_end() {
    let chip = SimChip::new();
    let tail = boot::image_crc(&chip, u32::MAX - 1, 16);
    assert_eq!(tail, boot::image_crc(&chip, u32::MAX - 1, 2));
}

/// Chip whose RAM drops bit 0 at one address.
struct StuckBitChip {
    inner: SimChip,
    addr: u32,
}

impl Chip for StuckBitChip {
    fn read(&self, addr: u32) -> u16 {
        self.inner.read(addr)
    }

    fn write(&self, addr: u32, value: u16) {
        let value = if addr == self.addr { value & !1 } else { value };
        self.inner.write(addr, value);
    }

    fn set_eallow(&self, allow: bool) -> bool {
        self.inner.set_eallow(allow)
    }

    fn set_ier(&self, mask: u16) {
        self.inner.set_ier(mask)
    }

    fn enable_interrupts(&self) {
        self.inner.enable_interrupts()
    }

    fn spin(&self, cycles: u32) {
        self.inner.spin(cycles)
    }
}

#[test]
fn test_relocation_detects_corrupted_copy() {
    let layout = RamFuncLayout::DEFAULT;
    let chip = StuckBitChip {
        inner: SimChip::new(),
        addr: layout.run_start + 4,
    };
    // Erased flash is 0xFFFF, so the stuck bit always differs
    let result = boot::relocate(&chip, &layout);
    assert!(matches!(result, Err(Error::RelocationMismatch { .. })));
}

#[test]
fn test_flash_timing_configured() {
    let (chip, _) = booted_chip();

    assert_eq!(chip.peek_field(flash::PWR), 3);
    assert_eq!(chip.peek_field(flash::RANDWAIT), 2);
    assert_eq!(chip.peek_field(flash::PAGEWAIT), 2);
    assert_eq!(chip.peek_field(flash::ENPIPE), 1);
}

#[test]
fn test_pll_configured_for_90mhz() {
    let (chip, _) = booted_chip();

    assert_eq!(chip.peek_field(sysctrl::PLL_DIV), 9);
    assert_eq!(chip.peek_field(sysctrl::DIVSEL), 3);
    assert_eq!(chip.peek_field(sysctrl::MCLKOFF), 0);
    assert_eq!(chip.peek_field(sysctrl::PLLLOCKS), 1);
    assert_eq!(chip.sysclk_hz(), 90_000_000);
    assert!(chip.stats().pll_lock_polls >= DEFAULT_PLL_LOCK_POLLS);
}

#[test]
fn test_pll_lock_wait_follows_latency() {
    let slow = SimChip::with_pll_lock_latency(50);
    let state = SharedState::new();
    let mut delay = SimDelay::new(&slow);
    Firmware::boot(&slow, &state, &mut delay, &RamFuncLayout::DEFAULT).unwrap();

    assert!(slow.stats().pll_lock_polls >= 50);
    assert_eq!(slow.sysclk_hz(), 90_000_000);
}

#[test]
fn test_timer_configured_and_started() {
    let (chip, _) = booted_chip();

    assert_eq!(chip.peek32(cpu_timer::PRD), 899);
    assert_eq!(chip.peek_field(cpu_timer::TDDR), 0);
    assert_eq!(chip.peek_field(cpu_timer::TDDRH), 0);
    assert_eq!(chip.peek_field(cpu_timer::TIE), 1);
    assert_eq!(chip.peek_field(cpu_timer::TSS), 0);
}

#[test]
fn test_timer_init_leaves_timer_stopped() {
    let chip = SimChip::new();
    timer::init(&chip);
    let periods = chip.stats().timer_periods;

    chip.advance(100_000);

    assert_eq!(chip.peek_field(cpu_timer::TSS), 1);
    assert_eq!(chip.stats().timer_periods, periods);
    assert_eq!(chip.peek(pie::pieifr(1)), 0);
}

#[test]
fn test_adc_configured() {
    let (chip, _) = booted_chip();

    assert_eq!(chip.peek_field(sysctrl::ADCENCLK), 1);
    assert_eq!(chip.peek_field(adc::CLKDIV2EN), 1);
    assert_eq!(chip.peek_field(adc::ADCNONOVERLAP), 1);
    assert_eq!(chip.peek_field(adc::ADCPWDN), 1);
    assert_eq!(chip.peek_field(adc::ADCBGPWD), 1);
    assert_eq!(chip.peek_field(adc::ADCREFPWD), 1);
    assert_eq!(chip.peek_field(adc::ADCENABLE), 1);
    assert_eq!(chip.peek_field(adc::CHSEL), 0);
    assert_eq!(chip.peek_field(adc::ACQPS), 6);
    assert_eq!(chip.peek_field(adc::TRIGSEL), 0);
    assert_eq!(chip.peek_field(adc::INT1SEL), 0);
    assert_eq!(chip.peek_field(adc::INT1E), 1);
    assert_eq!(chip.peek_field(adc::INTPULSEPOS), 1);
}

#[test]
fn test_adc_settle_uses_time_source() {
    let chip = SimChip::new();
    let state = SharedState::new();
    let mut delay = SimDelay::new(&chip);
    Firmware::boot(&chip, &state, &mut delay, &RamFuncLayout::DEFAULT).unwrap();

    assert!(delay.total_ns() >= 1_000_000);
    assert!(chip.elapsed_ns() >= 1_000_000);
    // Flash pipeline flush, ADC clock settle, ePWM clock and TBCLKSYNC settle
    assert_eq!(chip.stats().spin_cycles, 7 + 2 + 2 + 2);
}

#[test]
fn test_pwm_configured() {
    let (chip, state) = booted_chip();

    assert_eq!(chip.peek(epwm::TBPRD), 45_000);
    assert_eq!(state.tbprd(), 45_000);
    assert_eq!(chip.peek(epwm::CMPA), 40_500);
    assert_eq!(chip.peek_field(epwm::CTRMODE), 2);
    assert_eq!(chip.peek_field(epwm::HSPCLKDIV), 0);
    assert_eq!(chip.peek_field(epwm::CLKDIV), 0);

    assert_eq!(chip.peek_field(epwm::Output::A.cau()), 1);
    assert_eq!(chip.peek_field(epwm::Output::A.cad()), 2);
    assert_eq!(chip.peek_field(epwm::Output::B.cau()), 2);
    assert_eq!(chip.peek_field(epwm::Output::B.cad()), 1);

    assert_eq!(chip.peek_field(epwm::SOCASEL), 2);
    assert_eq!(chip.peek_field(epwm::SOCAEN), 1);
    assert_eq!(chip.peek_field(epwm::SOCAPRD), 1);

    assert_eq!(chip.peek_field(sysctrl::EPWM1ENCLK), 1);
    assert_eq!(chip.peek_field(sysctrl::TBCLKSYNC), 1);
}

#[test]
fn test_pins_configured() {
    let (chip, _) = booted_chip();

    for pin in LED_PINS {
        assert_eq!(chip.peek_field(gpio::dir_field(pin)), 1);
        assert_eq!(chip.peek_field(gpio::pud_field(pin)), 1);
        // Active low: high latch means off
        assert!(chip.output_level(pin));
    }
    assert_eq!(chip.peek_field(gpio::dir_field(BUTTON_PIN)), 0);
    assert_eq!(chip.peek_field(gpio::pud_field(BUTTON_PIN)), 1);

    assert_eq!(chip.peek_field(gpio::mux_field(0)), gpio::MUX_EPWM1A);
    assert_eq!(chip.peek_field(gpio::mux_field(PWM_RESET_PIN)), gpio::MUX_GPIO);
    assert_eq!(chip.peek_field(gpio::dir_field(PWM_RESET_PIN)), 1);
    assert!(chip.output_level(PWM_RESET_PIN));
}

#[test]
fn test_interrupts_enabled() {
    let (chip, _) = booted_chip();

    assert_eq!(chip.peek_field(pie::ENPIE), 1);
    assert_eq!(chip.peek(pie::pieier(1)), (1 << 0) | (1 << 6));
    assert_eq!(chip.ier(), 0x0001);
    assert!(chip.interrupts_enabled());
}

#[test]
fn test_boot_leaves_chip_protected_and_watchdog_running() {
    let (chip, _) = booted_chip();

    assert!(!chip.eallow_active());
    assert_eq!(chip.peek(sysctrl::WDCR), WDCR_ENABLE);
    assert_eq!(chip.stats().protection_faults, 0);
    assert_eq!(chip.stats().watchdog_resets, 0);
}

#[test]
fn test_leds_can_be_driven_after_boot() {
    let chip = SimChip::new();
    let state = SharedState::new();
    let mut sim = Simulation::boot(&chip, &state).unwrap();

    let leds = sim.firmware_mut().leds_mut();
    leds[1].on();
    assert!(leds[1].is_on());
    assert!(!chip.output_level(LED_PINS[1]));

    leds[1].toggle();
    assert!(chip.output_level(LED_PINS[1]));
}
