// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command-line interface definitions.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use piccolo_firmware::sim::ADC_FULL_SCALE;

use crate::commands;

/// Command-line arguments.
#[derive(Parser)]
#[command(name = "piccolo-sim")]
#[command(version = env!("PICCOLO_VERSION"))]
#[command(about = "Run the piccolo sampler firmware on a simulated chip")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Print the clock, timer and PWM values the firmware derives
    Config,

    /// Boot the firmware and run it for a number of timer ticks
    Run {
        /// Timer ticks to run (100 kHz)
        #[arg(short, long, default_value = "1000")]
        ticks: u64,

        /// Tick at which the push button goes down
        #[arg(long, value_name = "TICK")]
        press_from: Option<u64>,

        /// Tick at which the push button is released (default: never)
        #[arg(long, value_name = "TICK", requires = "press_from")]
        press_until: Option<u64>,

        /// Drive ADCINA0 with a fixed 12-bit level instead of the PWM output
        #[arg(short, long, value_parser = parse_adc_level)]
        analog: Option<u16>,

        /// Write a capture of the final state to FILE
        #[arg(short, long, value_name = "FILE")]
        capture: Option<PathBuf>,
    },

    /// Verify and summarize a capture file
    Decode {
        /// Capture file written by `run --capture`
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// Parse a 12-bit ADC level, decimal or hex with a 0x prefix.
fn parse_adc_level(s: &str) -> Result<u16, String> {
    let value = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    }
    .map_err(|e| format!("invalid ADC level: {e}"))?;
    if value > ADC_FULL_SCALE {
        return Err(format!("ADC level {value} exceeds {ADC_FULL_SCALE}"));
    }
    Ok(value)
}

/// Execute the parsed CLI command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Config => commands::config(),
        Commands::Run {
            ticks,
            press_from,
            press_until,
            analog,
            capture,
        } => {
            let press = match (press_from, press_until) {
                (Some(from), Some(until)) if until <= from => {
                    bail!("--press-until ({until}) must be after --press-from ({from})")
                }
                (Some(from), until) => from..until.unwrap_or(u64::MAX),
                (None, _) => 0..0,
            };
            commands::run(ticks, press, analog, capture.as_deref())
        }
        Commands::Decode { file } => commands::decode(&file),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_defaults() {
        let cli = Cli::try_parse_from(["piccolo-sim", "run"]).unwrap();
        match cli.command {
            Commands::Run {
                ticks,
                press_from,
                press_until,
                analog,
                capture,
            } => {
                assert_eq!(ticks, 1000);
                assert_eq!(press_from, None);
                assert_eq!(press_until, None);
                assert_eq!(analog, None);
                assert!(capture.is_none());
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_run_with_press_window() {
        let cli = Cli::try_parse_from([
            "piccolo-sim",
            "run",
            "--ticks",
            "5000",
            "--press-from",
            "100",
            "--press-until",
            "200",
            "--capture",
            "out.bin",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                ticks,
                press_from,
                press_until,
                capture,
                ..
            } => {
                assert_eq!(ticks, 5000);
                assert_eq!(press_from, Some(100));
                assert_eq!(press_until, Some(200));
                assert_eq!(capture, Some(PathBuf::from("out.bin")));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_press_until_requires_press_from() {
        assert!(Cli::try_parse_from(["piccolo-sim", "run", "--press-until", "10"]).is_err());
    }

    #[test]
    fn test_adc_level_parsing() {
        assert_eq!(parse_adc_level("2048"), Ok(2048));
        assert_eq!(parse_adc_level("0xFFF"), Ok(4095));
        assert!(parse_adc_level("4096").is_err());
        assert!(parse_adc_level("abc").is_err());
    }

    #[test]
    fn test_parse_decode() {
        let cli = Cli::try_parse_from(["piccolo-sim", "decode", "capture.bin"]).unwrap();
        assert!(matches!(cli.command, Commands::Decode { file } if file == PathBuf::from("capture.bin")));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
