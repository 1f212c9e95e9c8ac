// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command implementations for the simulator.

use std::fs;
use std::ops::Range;
use std::path::Path;

use anyhow::{bail, Context, Result};
use crc::{Crc, CRC_32_ISO_HDLC};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use piccolo_firmware::config::{
    PWM_FREQ_HZ, SAMPLE_COUNT, SYSCLK_HZ, TIMER_TICK_HZ, WDCR_ENABLE,
};
use piccolo_firmware::sim::{SimChip, SimStats, Simulation};
use piccolo_firmware::{pwm, timer, SharedState, Snapshot};

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);
const TRAILER_SIZE: usize = 4;
/// Ticks between progress bar updates.
const PROGRESS_STRIDE: u64 = 1_000;

/// Final state of a simulation run, as stored by `run --capture`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    pub ticks: u64,
    /// ADC handler invocations.
    pub conversions_handled: u64,
    pub snapshot: Snapshot,
    pub stats: SimStats,
}

impl Capture {
    /// Samples actually written, oldest first.
    pub fn recorded_samples(&self) -> Vec<u16> {
        if self.ticks >= SAMPLE_COUNT as u64 {
            self.snapshot.chronological().collect()
        } else {
            let written = (self.ticks as usize).min(self.snapshot.samples.len());
            self.snapshot.samples[..written].to_vec()
        }
    }
}

/// Postcard payload followed by its little-endian CRC-32.
pub fn encode_capture(capture: &Capture) -> Result<Vec<u8>> {
    let mut bytes = postcard::to_stdvec(capture).context("Failed to encode capture")?;
    let crc = CRC32.checksum(&bytes);
    bytes.extend_from_slice(&crc.to_le_bytes());
    Ok(bytes)
}

pub fn decode_capture(bytes: &[u8]) -> Result<Capture> {
    if bytes.len() < TRAILER_SIZE {
        bail!("Capture too short ({} bytes)", bytes.len());
    }
    let (payload, trailer) = bytes.split_at(bytes.len() - TRAILER_SIZE);
    let expected = u32::from_le_bytes(trailer.try_into()?);
    let actual = CRC32.checksum(payload);
    if expected != actual {
        bail!(
            "CRC mismatch: stored 0x{:08x}, computed 0x{:08x}",
            expected,
            actual
        );
    }
    postcard::from_bytes(payload).context("Failed to decode capture")
}

/// Minimum, maximum and mean of a sample window.
pub fn sample_summary(samples: &[u16]) -> Option<(u16, u16, f64)> {
    let min = *samples.iter().min()?;
    let max = *samples.iter().max()?;
    let sum: u64 = samples.iter().map(|&s| s as u64).sum();
    Some((min, max, sum as f64 / samples.len() as f64))
}

fn duty_percent(compare: u16, tbprd: u16) -> f64 {
    if tbprd == 0 {
        return 0.0;
    }
    100.0 * compare as f64 / tbprd as f64
}

/// Print the values the firmware derives from its configuration.
pub fn config() -> Result<()> {
    let tbprd = pwm::period(SYSCLK_HZ, PWM_FREQ_HZ);
    println!("Configuration:");
    println!("  SYSCLK:        {} Hz", SYSCLK_HZ);
    println!(
        "  Timer 0:       {} Hz (PRD {})",
        TIMER_TICK_HZ,
        timer::period(SYSCLK_HZ, TIMER_TICK_HZ)
    );
    println!("  ePWM1:         {} Hz (TBPRD {}, up-down)", PWM_FREQ_HZ, tbprd);
    println!("  CMPA pressed:  {}", pwm::duty_compare(tbprd, true));
    println!("  CMPA released: {}", pwm::duty_compare(tbprd, false));
    println!("  Samples:       {}", SAMPLE_COUNT);
    println!("  WDCR:          0x{:04x}", WDCR_ENABLE);
    Ok(())
}

/// Boot the firmware and run it for `ticks` timer interrupts.
///
/// The button is held down for ticks inside `press`.
pub fn run(ticks: u64, press: Range<u64>, analog: Option<u16>, capture: Option<&Path>) -> Result<()> {
    let chip = SimChip::new();
    let state = SharedState::new();
    chip.set_analog_input(analog);

    let mut sim = Simulation::boot(&chip, &state).context("Boot failed")?;
    println!("Booted in {} us at {} Hz", chip.elapsed_ns() / 1_000, chip.sysclk_hz());

    let pb = ProgressBar::new(ticks);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ticks ({eta})",
            )?
            .progress_chars("#>-"),
    );

    for tick in 0..ticks {
        chip.set_button(press.contains(&tick));
        if let Err(e) = sim.run_ticks(1) {
            pb.abandon();
            bail!("Firmware stopped at tick {}: {}", tick, e);
        }
        if tick % PROGRESS_STRIDE == 0 {
            pb.set_position(tick);
        }
    }
    pb.finish_and_clear();

    let result = Capture {
        ticks: sim.ticks(),
        conversions_handled: sim.conversions_handled(),
        snapshot: state.snapshot(),
        stats: chip.stats(),
    };
    print_report(&result);

    if let Some(path) = capture {
        let bytes = encode_capture(&result)?;
        fs::write(path, &bytes).with_context(|| format!("Failed to write {}", path.display()))?;
        println!();
        println!("Capture: {} ({} bytes)", path.display(), bytes.len());
    }

    Ok(())
}

/// Verify a capture file and print its summary.
pub fn decode(file: &Path) -> Result<()> {
    let bytes = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let capture =
        decode_capture(&bytes).with_context(|| format!("Invalid capture {}", file.display()))?;

    println!("Capture: {} ({} bytes, CRC OK)", file.display(), bytes.len());
    print_report(&capture);
    Ok(())
}

fn print_report(capture: &Capture) {
    let snapshot = &capture.snapshot;
    let stats = &capture.stats;

    println!("Firmware:");
    println!("  Ticks:         {}", capture.ticks);
    println!("  Conversions:   {}", capture.conversions_handled);
    println!("  Counter:       {}", snapshot.counter);
    println!(
        "  Button:        {}",
        if snapshot.push_button_pressed { "pressed" } else { "released" }
    );
    println!(
        "  CMPA:          {} ({:.1}% of {})",
        snapshot.compare_value,
        duty_percent(snapshot.compare_value, snapshot.tbprd),
        snapshot.tbprd
    );
    println!("  Measured:      {}", snapshot.measured_value);

    let samples = capture.recorded_samples();
    match sample_summary(&samples) {
        Some((min, max, mean)) => println!(
            "  Samples:       {} (min {}, max {}, mean {:.1})",
            samples.len(),
            min,
            max,
            mean
        ),
        None => println!("  Samples:       none"),
    }

    println!("Simulator:");
    println!("  Cycles:        {}", stats.cycles);
    println!("  Missed ticks:  {}", stats.missed_ticks);
    println!("  ADC overruns:  {}", stats.adc_overruns);
    println!("  WD services:   {}", stats.watchdog_services);
    println!("  WD resets:     {}", stats.watchdog_resets);
    println!("  EALLOW faults: {}", stats.protection_faults);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulated_capture(ticks: u64) -> Capture {
        let chip = SimChip::new();
        let state = SharedState::new();
        let mut sim = Simulation::boot(&chip, &state).unwrap();
        sim.run_ticks(ticks).unwrap();
        Capture {
            ticks: sim.ticks(),
            conversions_handled: sim.conversions_handled(),
            snapshot: state.snapshot(),
            stats: chip.stats(),
        }
    }

    #[test]
    fn test_capture_survives_file_format() {
        let capture = simulated_capture(20);
        let bytes = encode_capture(&capture).unwrap();
        assert_eq!(decode_capture(&bytes).unwrap(), capture);
    }

    #[test]
    fn test_capture_keeps_handled_conversions() {
        let capture = simulated_capture(12);
        assert_eq!(capture.conversions_handled, 12);
        let decoded = decode_capture(&encode_capture(&capture).unwrap()).unwrap();
        assert_eq!(decoded.conversions_handled, capture.conversions_handled);
    }

    #[test]
    fn test_corrupted_capture_rejected() {
        let mut bytes = encode_capture(&simulated_capture(5)).unwrap();
        bytes[2] ^= 0x40;
        let err = decode_capture(&bytes).unwrap_err();
        assert!(err.to_string().contains("CRC mismatch"));
    }

    #[test]
    fn test_truncated_capture_rejected() {
        assert!(decode_capture(&[0x01, 0x02]).is_err());
        assert!(decode_capture(&[]).is_err());
    }

    #[test]
    fn test_recorded_samples_before_wrap() {
        let capture = simulated_capture(3);
        assert_eq!(capture.recorded_samples(), vec![0, 3_685, 3_685]);
    }

    #[test]
    fn test_recorded_samples_after_wrap() {
        let capture = simulated_capture(SAMPLE_COUNT as u64 + 10);
        let samples = capture.recorded_samples();
        assert_eq!(samples.len(), SAMPLE_COUNT);
        assert!(samples.iter().all(|&s| s == 3_685));
    }

    #[test]
    fn test_sample_summary() {
        assert_eq!(sample_summary(&[]), None);
        assert_eq!(sample_summary(&[10, 30, 20]), Some((10, 30, 20.0)));
    }

    #[test]
    fn test_duty_percent() {
        assert_eq!(duty_percent(4_500, 45_000), 10.0);
        assert_eq!(duty_percent(1, 0), 0.0);
    }
}
