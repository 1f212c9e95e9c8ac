// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Cycle-approximate model of the Piccolo core and the peripherals the
//! firmware touches.

use core::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::clock::sysclk_hz;
use crate::config::{OSC_CLK_HZ, PWM_OUTPUT_PIN, WDKEY_ARM, WDKEY_RESET};
use crate::hw::gpio::MUX_EPWM1A;
use crate::hw::{self, adc, cpu_timer, epwm, gpio, pie, sysctrl, Chip, Field};
use crate::interrupts::InterruptId;

/// SYSCLK cycles from a forced SOC to end of conversion.
pub const CONVERSION_CYCLES: u32 = 40;
/// Full-scale 12-bit ADC result.
pub const ADC_FULL_SCALE: u16 = 4095;
/// PLLSTS reads before PLLLOCKS sets after a PLLCR write.
pub const DEFAULT_PLL_LOCK_POLLS: u32 = 3;
/// The watchdog counter advances once per 512 oscillator periods.
const WATCHDOG_OSC_DIVIDER: u64 = 512;
/// An 8-bit watchdog counter resets the chip when it overflows.
const WATCHDOG_LIMIT: u16 = 256;
const PS_PER_SECOND: u64 = 1_000_000_000_000;

const LOW_WORDS: usize = 0x8000;
const L0_WORDS: usize = (hw::L0_RAM.end - hw::L0_RAM.start) as usize;
const FLASH_WORDS: usize = (hw::FLASH.end - hw::FLASH.start) as usize;

/// Counters describing what the simulated hardware observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimStats {
    pub cycles: u64,
    pub spin_cycles: u64,
    pub pll_lock_polls: u32,
    pub timer_periods: u64,
    /// Timer periods that elapsed while the previous TINT0 was still pending
    pub missed_ticks: u64,
    pub conversions: u64,
    /// Conversions completed while ADCINT1 was still flagged
    pub adc_overruns: u64,
    pub watchdog_services: u64,
    pub watchdog_resets: u32,
    /// Protected writes attempted without EALLOW
    pub protection_faults: u32,
    pub unmapped_accesses: u32,
    pub interrupts_accepted: u64,
}

struct Inner {
    low: [u16; LOW_WORDS],
    l0: [u16; L0_WORDS],
    flash: [u16; FLASH_WORDS],

    eallow: bool,
    ier: u16,
    interrupts_enabled: bool,

    elapsed_ps: u64,
    pll_lock_latency: u32,
    pll_polls_remaining: u32,
    timer_accum: u64,
    conversion: Option<(u32, u16)>,
    watchdog_accum_ps: u64,
    watchdog_armed: bool,
    reset_latched: bool,

    button: bool,
    analog_override: Option<u16>,

    stats: SimStats,
}

/// Simulated chip implementing [`Chip`].
pub struct SimChip {
    inner: RefCell<Inner>,
}

impl SimChip {
    pub fn new() -> Self {
        Self::with_pll_lock_latency(DEFAULT_PLL_LOCK_POLLS)
    }

    /// Chip whose PLL reports lock after `polls` status reads.
    pub fn with_pll_lock_latency(polls: u32) -> Self {
        let mut inner = Inner {
            low: [0; LOW_WORDS],
            l0: [0; L0_WORDS],
            flash: [0xFFFF; FLASH_WORDS],
            eallow: false,
            ier: 0,
            interrupts_enabled: false,
            elapsed_ps: 0,
            pll_lock_latency: polls,
            pll_polls_remaining: 0,
            timer_accum: 0,
            conversion: None,
            watchdog_accum_ps: 0,
            watchdog_armed: false,
            reset_latched: false,
            button: false,
            analog_override: None,
            stats: SimStats::default(),
        };
        // Power-on values: timer free running at maximum period, PLL bypassed
        // and locked.
        inner.store32(cpu_timer::PRD, u32::MAX);
        inner.store_field(sysctrl::PLLLOCKS, 1);
        Self {
            inner: RefCell::new(inner),
        }
    }

    /// Write an image into flash, as a programmer would. Words outside flash
    /// are skipped; returns the number written.
    pub fn program_flash(&self, start: u32, words: &[u16]) -> usize {
        let mut inner = self.inner.borrow_mut();
        let mut written = 0;
        for (addr, word) in (start..).zip(words.iter().copied()) {
            if hw::is_flash(addr) {
                inner.flash[(addr - hw::FLASH.start) as usize] = word;
                written += 1;
            }
        }
        written
    }

    /// Read without side effects.
    pub fn peek(&self, addr: u32) -> u16 {
        self.inner.borrow().load(addr).unwrap_or(0)
    }

    pub fn peek_field(&self, field: Field) -> u16 {
        (self.peek(field.addr) & field.mask()) >> field.shift
    }

    pub fn peek32(&self, addr: u32) -> u32 {
        self.peek(addr) as u32 | (self.peek(addr + 1) as u32) << 16
    }

    /// Write without protection checks or side effects.
    pub fn poke(&self, addr: u32, value: u16) {
        self.inner.borrow_mut().store(addr, value);
    }

    pub fn advance(&self, cycles: u32) {
        self.inner.borrow_mut().advance(cycles as u64);
    }

    pub fn advance_ns(&self, ns: u64) {
        let mut inner = self.inner.borrow_mut();
        let cycles = (ns * inner.sysclk_hz() as u64).div_ceil(1_000_000_000);
        inner.advance(cycles);
    }

    pub fn set_button(&self, pressed: bool) {
        self.inner.borrow_mut().button = pressed;
    }

    /// Drive ADCINA0 directly instead of from the ePWM1A average.
    pub fn set_analog_input(&self, value: Option<u16>) {
        self.inner.borrow_mut().analog_override = value.map(|v| v.min(ADC_FULL_SCALE));
    }

    /// Level currently presented to ADCINA0.
    pub fn analog_input(&self) -> u16 {
        self.inner.borrow().analog_level()
    }

    /// Output latch of `pin`.
    pub fn output_level(&self, pin: u8) -> bool {
        self.peek_field(gpio::dat_field(pin)) == 1
    }

    /// Take the highest-priority interrupt the PIE would deliver now.
    ///
    /// Acceptance clears the PIEIFR bit and sets the group's PIEACK bit; the
    /// group stays closed until the handler acknowledges it.
    pub fn accept_interrupt(&self) -> Option<InterruptId> {
        self.inner.borrow_mut().accept_interrupt()
    }

    pub fn eallow_active(&self) -> bool {
        self.inner.borrow().eallow
    }

    pub fn interrupts_enabled(&self) -> bool {
        self.inner.borrow().interrupts_enabled
    }

    pub fn ier(&self) -> u16 {
        self.inner.borrow().ier
    }

    pub fn sysclk_hz(&self) -> u32 {
        self.inner.borrow().sysclk_hz()
    }

    pub fn elapsed_ns(&self) -> u64 {
        self.inner.borrow().elapsed_ps / 1_000
    }

    /// First key written, second still outstanding.
    pub fn watchdog_armed(&self) -> bool {
        self.inner.borrow().watchdog_armed
    }

    pub fn stats(&self) -> SimStats {
        self.inner.borrow().stats
    }

    /// Returns true once per watchdog reset.
    pub fn take_reset(&self) -> bool {
        core::mem::take(&mut self.inner.borrow_mut().reset_latched)
    }
}

impl Default for SimChip {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip for SimChip {
    fn read(&self, addr: u32) -> u16 {
        self.inner.borrow_mut().read(addr)
    }

    fn write(&self, addr: u32, value: u16) {
        self.inner.borrow_mut().write(addr, value);
    }

    fn set_eallow(&self, allow: bool) -> bool {
        core::mem::replace(&mut self.inner.borrow_mut().eallow, allow)
    }

    fn set_ier(&self, mask: u16) {
        self.inner.borrow_mut().ier = mask;
    }

    fn enable_interrupts(&self) {
        self.inner.borrow_mut().interrupts_enabled = true;
    }

    fn spin(&self, cycles: u32) {
        let mut inner = self.inner.borrow_mut();
        inner.stats.spin_cycles += cycles as u64;
        inner.advance(cycles as u64);
    }
}

/// Strobe registers that read as zero and act on their data register.
fn strobe_target(addr: u32) -> Option<(u32, Strobe)> {
    let port_a = gpio::GPASET..gpio::GPATOGGLE + 2;
    let port_b = gpio::GPBSET..gpio::GPBTOGGLE + 2;
    let (dat, offset) = if port_a.contains(&addr) {
        (gpio::GPADAT, addr - gpio::GPADAT)
    } else if port_b.contains(&addr) {
        (gpio::GPBDAT, addr - gpio::GPBDAT)
    } else {
        return None;
    };
    let kind = match offset / 2 {
        1 => Strobe::Set,
        2 => Strobe::Clear,
        _ => Strobe::Toggle,
    };
    Some((dat + offset % 2, kind))
}

#[derive(Clone, Copy)]
enum Strobe {
    Set,
    Clear,
    Toggle,
}

impl Inner {
    fn slot(&self, addr: u32) -> Option<&u16> {
        if (addr as usize) < LOW_WORDS {
            self.low.get(addr as usize)
        } else if hw::L0_RAM.contains(&addr) {
            self.l0.get((addr - hw::L0_RAM.start) as usize)
        } else if hw::is_flash(addr) {
            self.flash.get((addr - hw::FLASH.start) as usize)
        } else {
            None
        }
    }

    fn slot_mut(&mut self, addr: u32) -> Option<&mut u16> {
        if (addr as usize) < LOW_WORDS {
            self.low.get_mut(addr as usize)
        } else if hw::L0_RAM.contains(&addr) {
            self.l0.get_mut((addr - hw::L0_RAM.start) as usize)
        } else {
            None
        }
    }

    fn load(&self, addr: u32) -> Option<u16> {
        self.slot(addr).copied()
    }

    fn store(&mut self, addr: u32, value: u16) {
        match self.slot_mut(addr) {
            Some(word) => *word = value,
            None => self.stats.unmapped_accesses += 1,
        }
    }

    fn store32(&mut self, addr: u32, value: u32) {
        self.store(addr, value as u16);
        self.store(addr + 1, (value >> 16) as u16);
    }

    fn field(&self, field: Field) -> u16 {
        (self.load(field.addr).unwrap_or(0) & field.mask()) >> field.shift
    }

    fn store_field(&mut self, field: Field, value: u16) {
        let mask = field.mask();
        let word = self.load(field.addr).unwrap_or(0) & !mask;
        self.store(field.addr, word | (((value as u32) << field.shift) as u16 & mask));
    }

    fn sysclk_hz(&self) -> u32 {
        sysclk_hz(
            OSC_CLK_HZ,
            self.field(sysctrl::PLL_DIV),
            self.field(sysctrl::DIVSEL),
        )
    }

    fn cycle_ps(&self) -> u64 {
        PS_PER_SECOND / self.sysclk_hz() as u64
    }

    fn read(&mut self, addr: u32) -> u16 {
        match addr {
            sysctrl::PLLSTS => {
                self.stats.pll_lock_polls += 1;
                if self.pll_polls_remaining > 0 {
                    self.pll_polls_remaining -= 1;
                    if self.pll_polls_remaining == 0 {
                        self.store_field(sysctrl::PLLLOCKS, 1);
                    }
                }
            }
            gpio::GPADAT | gpio::GPBDAT => return self.port_level(addr),
            a if a == gpio::GPADAT + 1 || a == gpio::GPBDAT + 1 => return self.port_level(addr),
            adc::ADCSOCFRC1 | adc::ADCINTFLGCLR | sysctrl::WDKEY => return 0,
            a if strobe_target(a).is_some() => return 0,
            _ => {}
        }
        match self.load(addr) {
            Some(value) => value,
            None => {
                self.stats.unmapped_accesses += 1;
                0
            }
        }
    }

    /// GPxDAT: output latch for outputs, pad level for inputs.
    fn port_level(&self, dat_addr: u32) -> u16 {
        let dir_addr = if dat_addr >= gpio::GPBDAT {
            gpio::GPBDIR + (dat_addr - gpio::GPBDAT)
        } else {
            gpio::GPADIR + (dat_addr - gpio::GPADAT)
        };
        let latch = self.load(dat_addr).unwrap_or(0);
        let dir = self.load(dir_addr).unwrap_or(0);
        let button = gpio::dat_field(crate::config::BUTTON_PIN);
        let pads = if dat_addr == button.addr && self.button {
            button.mask()
        } else {
            0
        };
        (latch & dir) | (pads & !dir)
    }

    fn write(&mut self, addr: u32, value: u16) {
        if hw::is_protected(addr) && !self.eallow {
            self.stats.protection_faults += 1;
            return;
        }
        if let Some((dat, kind)) = strobe_target(addr) {
            let latch = self.load(dat).unwrap_or(0);
            let next = match kind {
                Strobe::Set => latch | value,
                Strobe::Clear => latch & !value,
                Strobe::Toggle => latch ^ value,
            };
            self.store(dat, next);
            return;
        }
        match addr {
            sysctrl::PLLCR => {
                self.store(addr, value);
                self.store_field(sysctrl::PLLLOCKS, 0);
                self.pll_polls_remaining = self.pll_lock_latency;
                if self.pll_lock_latency == 0 {
                    self.store_field(sysctrl::PLLLOCKS, 1);
                }
            }
            sysctrl::PLLSTS => {
                // PLLLOCKS is read-only
                let locks = sysctrl::PLLLOCKS.mask();
                let old = self.load(addr).unwrap_or(0);
                self.store(addr, (value & !locks) | (old & locks));
            }
            sysctrl::WDKEY => self.watchdog_key(value),
            sysctrl::WDCR => {
                if (value & sysctrl::WDCHK.mask()) >> sysctrl::WDCHK.shift != 0b101 {
                    self.watchdog_reset();
                } else {
                    self.store(addr, value & 0x7F);
                }
            }
            cpu_timer::TCR => {
                let old = self.load(addr).unwrap_or(0);
                let tif = cpu_timer::TIF.mask();
                let trb = cpu_timer::TRB.mask();
                // TIF is write-one-to-clear, TRB always reads back zero
                let flags = if value & tif != 0 { 0 } else { old & tif };
                if value & trb != 0 {
                    self.timer_accum = 0;
                    let period = self.load(cpu_timer::PRD).unwrap_or(0) as u32
                        | (self.load(cpu_timer::PRD + 1).unwrap_or(0) as u32) << 16;
                    self.store32(cpu_timer::TIM, period);
                }
                self.store(addr, (value & !(tif | trb)) | flags);
            }
            adc::ADCSOCFRC1 => {
                if value & adc::SOC0 != 0 && self.adc_ready() {
                    self.conversion = Some((CONVERSION_CYCLES, self.analog_level()));
                }
            }
            adc::ADCINTFLGCLR => {
                let flags = self.load(adc::ADCINTFLG).unwrap_or(0);
                self.store(adc::ADCINTFLG, flags & !value);
            }
            pie::PIEACK => {
                let acks = self.load(addr).unwrap_or(0);
                self.store(addr, acks & !value);
            }
            _ => self.store(addr, value),
        }
    }

    fn adc_ready(&self) -> bool {
        self.field(sysctrl::ADCENCLK) == 1
            && self.field(adc::ADCPWDN) == 1
            && self.field(adc::ADCBGPWD) == 1
            && self.field(adc::ADCREFPWD) == 1
            && self.field(adc::ADCENABLE) == 1
    }

    /// ADCINA0 is wired to the ePWM1A pin: its average level follows the duty.
    fn analog_level(&self) -> u16 {
        if let Some(value) = self.analog_override {
            return value;
        }
        let muxed = self.field(gpio::mux_field(PWM_OUTPUT_PIN)) == MUX_EPWM1A;
        let running = self.field(sysctrl::TBCLKSYNC) == 1;
        let tbprd = self.load(epwm::TBPRD).unwrap_or(0) as u32;
        if !muxed || !running || tbprd == 0 {
            return 0;
        }
        // Up-down count, clear on CAU and set on CAD: high while TBCTR < CMPA
        let cmpa = (self.load(epwm::CMPA).unwrap_or(0) as u32).min(tbprd);
        (ADC_FULL_SCALE as u32 * cmpa / tbprd) as u16
    }

    fn watchdog_key(&mut self, key: u16) {
        match key {
            WDKEY_ARM => self.watchdog_armed = true,
            WDKEY_RESET if self.watchdog_armed => {
                self.watchdog_armed = false;
                self.watchdog_accum_ps = 0;
                self.store(sysctrl::WDCNTR, 0);
                self.stats.watchdog_services += 1;
            }
            _ => self.watchdog_armed = false,
        }
    }

    fn watchdog_reset(&mut self) {
        self.stats.watchdog_resets += 1;
        self.reset_latched = true;
        self.watchdog_armed = false;
        self.watchdog_accum_ps = 0;
        self.store(sysctrl::WDCNTR, 0);
    }

    fn advance(&mut self, cycles: u64) {
        let elapsed = cycles * self.cycle_ps();
        self.stats.cycles += cycles;
        self.elapsed_ps += elapsed;

        self.advance_timer(cycles);
        self.advance_conversion(cycles);
        self.advance_watchdog(elapsed);
    }

    fn advance_timer(&mut self, cycles: u64) {
        if self.field(cpu_timer::TSS) == 1 {
            return;
        }
        let prd = self.load(cpu_timer::PRD).unwrap_or(0) as u64
            | (self.load(cpu_timer::PRD + 1).unwrap_or(0) as u64) << 16;
        let prescale =
            (self.field(cpu_timer::TDDRH) as u64) << 8 | self.field(cpu_timer::TDDR) as u64;
        let period = (prd + 1) * (prescale + 1);

        self.timer_accum += cycles;
        while self.timer_accum >= period {
            self.timer_accum -= period;
            self.timer_event();
        }
    }

    fn timer_event(&mut self) {
        self.stats.timer_periods += 1;
        self.store_field(cpu_timer::TIF, 1);
        if self.field(cpu_timer::TIE) == 0 {
            return;
        }
        let id = InterruptId::TInt0;
        if !self.raise(id) {
            self.stats.missed_ticks += 1;
        }
    }

    fn advance_conversion(&mut self, cycles: u64) {
        let Some((remaining, sample)) = self.conversion else {
            return;
        };
        if cycles < remaining as u64 {
            self.conversion = Some((remaining - cycles as u32, sample));
            return;
        }
        self.conversion = None;
        self.stats.conversions += 1;
        self.store(adc::ADCRESULT0, sample);

        if self.field(adc::INT1E) == 0 || self.field(adc::INT1SEL) != 0 {
            return;
        }
        let flags = self.load(adc::ADCINTFLG).unwrap_or(0);
        if flags & adc::ADCINT1 != 0 {
            // No new pulse until software clears the flag
            self.stats.adc_overruns += 1;
            return;
        }
        self.store(adc::ADCINTFLG, flags | adc::ADCINT1);
        self.raise(InterruptId::AdcInt1);
    }

    fn advance_watchdog(&mut self, elapsed_ps: u64) {
        if self.field(sysctrl::WDDIS) == 1 {
            return;
        }
        let prescale = match self.field(sysctrl::WDPS) {
            0 | 1 => 1,
            n => 1u64 << (n - 1),
        };
        let tick_ps = WATCHDOG_OSC_DIVIDER * prescale * (PS_PER_SECOND / OSC_CLK_HZ as u64);

        self.watchdog_accum_ps += elapsed_ps;
        while self.watchdog_accum_ps >= tick_ps {
            self.watchdog_accum_ps -= tick_ps;
            let count = self.load(sysctrl::WDCNTR).unwrap_or(0) + 1;
            if count >= WATCHDOG_LIMIT {
                self.watchdog_reset();
                return;
            }
            self.store(sysctrl::WDCNTR, count);
        }
    }

    /// Set the PIEIFR bit for `id`. Returns false if it was already pending.
    fn raise(&mut self, id: InterruptId) -> bool {
        let ifr = pie::pieifr(id.group());
        let mask = pie::slot_mask(id.slot());
        let flags = self.load(ifr).unwrap_or(0);
        self.store(ifr, flags | mask);
        flags & mask == 0
    }

    fn accept_interrupt(&mut self) -> Option<InterruptId> {
        if !self.interrupts_enabled || self.field(pie::ENPIE) == 0 {
            return None;
        }
        let acks = self.load(pie::PIEACK).unwrap_or(0);
        for group in 1..=pie::GROUPS as u8 {
            let line = 1u16 << (group - 1);
            if self.ier & line == 0 || acks & pie::ack_mask(group) != 0 {
                continue;
            }
            let ifr = pie::pieifr(group);
            let pending = self.load(ifr).unwrap_or(0) & self.load(pie::pieier(group)).unwrap_or(0);
            if pending == 0 {
                continue;
            }
            // Lowest INTx wins within a group
            let slot = pending.trailing_zeros() as u8 + 1;
            let flags = self.load(ifr).unwrap_or(0);
            self.store(ifr, flags & !pie::slot_mask(slot));
            self.store(pie::PIEACK, acks | pie::ack_mask(group));
            self.stats.interrupts_accepted += 1;
            return InterruptId::from_slot(group, slot);
        }
        None
    }
}
