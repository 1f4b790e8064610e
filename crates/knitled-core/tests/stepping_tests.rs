//! Row stepping rules.

use knitled_core::{KnitError, RowDelta, display_row_number, step_row};

// -----------------------------------------------------------------------------
// Closure and wraparound
// -----------------------------------------------------------------------------

#[test]
fn step_result_always_within_pattern() {
    for height in 1..=24u8 {
        for row in 0..height {
            for delta in [RowDelta::Back, RowDelta::Stay, RowDelta::Forward] {
                for from_bottom in [false, true] {
                    let next = step_row(row, height, delta, from_bottom);
                    assert!(next < height, "h={height} row={row} {delta:?} -> {next}");
                }
            }
        }
    }
}

#[test]
fn stepping_height_times_returns_to_start() {
    for height in 1..=24u8 {
        for start in 0..height {
            for delta in [RowDelta::Back, RowDelta::Forward] {
                for from_bottom in [false, true] {
                    let mut row = start;
                    for _ in 0..height {
                        row = step_row(row, height, delta, from_bottom);
                    }
                    assert_eq!(row, start);
                }
            }
        }
    }
}

#[test]
fn forward_from_last_row_wraps_to_top() {
    assert_eq!(step_row(23, 24, RowDelta::Forward, false), 0);
}

#[test]
fn back_from_top_wraps_to_last_row() {
    assert_eq!(step_row(0, 24, RowDelta::Back, false), 23);
}

#[test]
fn counting_from_bottom_inverts_direction() {
    let next = step_row(0, 24, RowDelta::Forward, true);

    assert_eq!(next, 23);
    assert_eq!(display_row_number(next, 24, true), 1);
    assert_eq!(step_row(5, 24, RowDelta::Back, true), 6);
}

#[test]
fn stay_keeps_the_row() {
    assert_eq!(step_row(7, 24, RowDelta::Stay, false), 7);
    assert_eq!(step_row(7, 24, RowDelta::Stay, true), 7);
}

#[test]
fn zero_height_yields_row_zero() {
    assert_eq!(step_row(3, 0, RowDelta::Forward, false), 0);
    assert_eq!(step_row(0, 0, RowDelta::Back, true), 0);
}

// -----------------------------------------------------------------------------
// Display labels and deltas
// -----------------------------------------------------------------------------

#[test]
fn display_row_is_one_based_from_top() {
    assert_eq!(display_row_number(0, 24, false), 1);
    assert_eq!(display_row_number(23, 24, false), 24);
}

#[test]
fn display_row_counts_from_bottom() {
    assert_eq!(display_row_number(23, 24, true), 1);
    assert_eq!(display_row_number(0, 24, true), 24);
}

#[test]
fn row_delta_accepts_only_unit_steps() {
    assert_eq!(RowDelta::try_from(-1), Ok(RowDelta::Back));
    assert_eq!(RowDelta::try_from(0), Ok(RowDelta::Stay));
    assert_eq!(RowDelta::try_from(1), Ok(RowDelta::Forward));
    assert_eq!(RowDelta::try_from(2), Err(KnitError::InvalidDelta));
    assert_eq!(RowDelta::try_from(-5), Err(KnitError::InvalidDelta));
}
