// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Sample ring and shared state.

use piccolo_firmware::config::SAMPLE_COUNT;
use piccolo_firmware::state::next_index;
use piccolo_firmware::{SharedState, Snapshot};

#[test]
fn test_next_index_wraps() {
    assert_eq!(next_index(0), 1);
    assert_eq!(next_index(998), 999);
    assert_eq!(next_index(999), 0);
}

#[test]
fn test_push_returns_next_slot() {
    let state = SharedState::new();
    assert_eq!(state.push_sample(7), 1);
    assert_eq!(state.sample(0), Some(7));
    assert_eq!(state.counter(), 1);
}

#[test]
fn test_counter_after_1000_and_1001_pushes() {
    let state = SharedState::new();
    for i in 0..SAMPLE_COUNT as u16 {
        state.push_sample(i);
    }
    assert_eq!(state.counter(), 0);

    state.push_sample(0xABC);
    assert_eq!(state.counter(), 1);
    assert_eq!(state.sample(0), Some(0xABC));
    assert_eq!(state.sample(1), Some(1));
}

#[test]
fn test_counter_stays_in_bounds() {
    let state = SharedState::new();
    for i in 0..5_000u32 {
        let next = state.push_sample(i as u16);
        assert!((next as usize) < SAMPLE_COUNT);
    }
    assert_eq!(state.sample(SAMPLE_COUNT), None);
}

#[test]
fn test_initial_values() {
    let state = SharedState::default();
    assert_eq!(state.counter(), 0);
    assert_eq!(state.measured_value(), 0);
    assert_eq!(state.compare_value(), 0);
    assert_eq!(state.tbprd(), 0);
    assert!(!state.push_button_pressed());
}

#[test]
fn test_snapshot_orders_oldest_first() {
    let state = SharedState::new();
    for i in 0..(SAMPLE_COUNT as u16 + 3) {
        state.push_sample(i);
    }
    state.set_measured_value(55);
    state.set_tbprd(45_000);
    state.set_compare_value(4_500);
    state.set_push_button_pressed(true);

    let snapshot: Snapshot = state.snapshot();
    assert_eq!(snapshot.counter, 3);
    assert_eq!(snapshot.measured_value, 55);
    assert_eq!(snapshot.tbprd, 45_000);
    assert_eq!(snapshot.compare_value, 4_500);
    assert!(snapshot.push_button_pressed);

    let ordered: Vec<u16> = snapshot.chronological().collect();
    assert_eq!(ordered.len(), SAMPLE_COUNT);
    assert_eq!(ordered[0], 3);
    assert_eq!(ordered[SAMPLE_COUNT - 1], SAMPLE_COUNT as u16 + 2);
}
