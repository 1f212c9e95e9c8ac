// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! State shared between the boot sequence and the interrupt handlers.
//!
//! Every field has exactly one writer. The chip has a single core and the two
//! handlers share a PIE group, so ordering comes from interrupt acceptance
//! alone and `Relaxed` atomics are sufficient.

use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::config::SAMPLE_COUNT;

/// Index following `index` in the circular sample buffer.
pub const fn next_index(index: u16) -> u16 {
    if index as usize + 1 >= SAMPLE_COUNT {
        0
    } else {
        index + 1
    }
}

pub struct SharedState {
    /// Written by the timer handler only.
    samples: [AtomicU16; SAMPLE_COUNT],
    /// Next slot in `samples`. Written by the timer handler only.
    counter: AtomicU16,
    /// Latest ADC result. Written by the ADC handler only.
    measured_value: AtomicU16,
    /// Button level seen on the last tick. Written by the timer handler only.
    push_button_pressed: AtomicBool,
    /// CMPA written on the last tick. Written by the timer handler only.
    compare_value: AtomicU16,
    /// ePWM1 period. Written once by PWM initialization.
    tbprd: AtomicU16,
}

impl SharedState {
    pub const fn new() -> Self {
        Self {
            samples: [const { AtomicU16::new(0) }; SAMPLE_COUNT],
            counter: AtomicU16::new(0),
            measured_value: AtomicU16::new(0),
            push_button_pressed: AtomicBool::new(false),
            compare_value: AtomicU16::new(0),
            tbprd: AtomicU16::new(0),
        }
    }

    /// Store `value` at the current index and advance, wrapping at the end.
    /// Returns the new index.
    pub fn push_sample(&self, value: u16) -> u16 {
        let index = self.counter.load(Ordering::Relaxed);
        self.samples[index as usize].store(value, Ordering::Relaxed);
        let next = next_index(index);
        self.counter.store(next, Ordering::Relaxed);
        next
    }

    pub fn sample(&self, index: usize) -> Option<u16> {
        self.samples.get(index).map(|s| s.load(Ordering::Relaxed))
    }

    pub fn counter(&self) -> u16 {
        self.counter.load(Ordering::Relaxed)
    }

    pub fn measured_value(&self) -> u16 {
        self.measured_value.load(Ordering::Relaxed)
    }

    pub fn set_measured_value(&self, value: u16) {
        self.measured_value.store(value, Ordering::Relaxed);
    }

    pub fn push_button_pressed(&self) -> bool {
        self.push_button_pressed.load(Ordering::Relaxed)
    }

    pub fn set_push_button_pressed(&self, pressed: bool) {
        self.push_button_pressed.store(pressed, Ordering::Relaxed);
    }

    pub fn compare_value(&self) -> u16 {
        self.compare_value.load(Ordering::Relaxed)
    }

    pub fn set_compare_value(&self, value: u16) {
        self.compare_value.store(value, Ordering::Relaxed);
    }

    pub fn tbprd(&self) -> u16 {
        self.tbprd.load(Ordering::Relaxed)
    }

    pub fn set_tbprd(&self, value: u16) {
        self.tbprd.store(value, Ordering::Relaxed);
    }

    /// Copy of the whole state. Not atomic as a unit; handlers may run between
    /// field reads.
    pub fn snapshot(&self) -> Snapshot {
        let mut samples = Vec::new();
        for sample in &self.samples {
            // Capacity equals SAMPLE_COUNT, so this never fails.
            let _ = samples.push(sample.load(Ordering::Relaxed));
        }
        Snapshot {
            counter: self.counter(),
            measured_value: self.measured_value(),
            push_button_pressed: self.push_button_pressed(),
            compare_value: self.compare_value(),
            tbprd: self.tbprd(),
            samples,
        }
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable copy of [`SharedState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub counter: u16,
    pub measured_value: u16,
    pub push_button_pressed: bool,
    pub compare_value: u16,
    pub tbprd: u16,
    pub samples: Vec<u16, SAMPLE_COUNT>,
}

impl Snapshot {
    /// Samples in write order, oldest first.
    pub fn chronological(&self) -> impl Iterator<Item = u16> + '_ {
        let split = (self.counter as usize).min(self.samples.len());
        self.samples[split..]
            .iter()
            .chain(self.samples[..split].iter())
            .copied()
    }
}
