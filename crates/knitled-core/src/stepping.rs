//! Row stepping rules
//!
//! All row movement, whatever its origin, goes through [`step_row`] so the
//! wraparound behaviour is identical for buttons, the carriage sensor and the
//! network API.

use crate::error::KnitError;

/// A signed single-row step request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDelta {
    Back,
    Stay,
    Forward,
}

impl RowDelta {
    pub const fn as_i16(self) -> i16 {
        match self {
            RowDelta::Back => -1,
            RowDelta::Stay => 0,
            RowDelta::Forward => 1,
        }
    }
}

impl TryFrom<i32> for RowDelta {
    type Error = KnitError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(RowDelta::Back),
            0 => Ok(RowDelta::Stay),
            1 => Ok(RowDelta::Forward),
            _ => Err(KnitError::InvalidDelta),
        }
    }
}

/// Compute the row reached from `current` after one step.
///
/// Counting from the bottom inverts the direction of travel through the
/// top-origin row index. The result always lies in `[0, height)`; a zero
/// height yields `0`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn step_row(current: u8, height: u8, delta: RowDelta, row_from_bottom: bool) -> u8 {
    if height == 0 {
        return 0;
    }
    let direction = if row_from_bottom { -1 } else { 1 };
    let next = i16::from(current) + delta.as_i16() * direction;
    // rem_euclid keeps the result in [0, height) for negative values too
    next.rem_euclid(i16::from(height)) as u8
}

/// The 1-based row label shown to the knitter.
pub fn display_row_number(active_row: u8, height: u8, row_from_bottom: bool) -> u8 {
    if row_from_bottom {
        height.saturating_sub(active_row)
    } else {
        active_row.saturating_add(1)
    }
}
