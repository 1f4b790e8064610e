//! Pattern grid
//!
//! A pattern is a fixed-capacity bit grid. Each row is stored as a `u16`
//! where bit `c` is storage column `c` (column 0 is the left edge).

use heapless::String;

/// Maximum number of columns (needles) a pattern may use.
pub const MAX_WIDTH: u8 = 12;
/// Maximum number of rows a pattern may use.
pub const MAX_HEIGHT: u8 = 24;
/// Maximum length of a pattern display name.
pub const MAX_NAME_LEN: usize = 32;

pub type PatternName = String<MAX_NAME_LEN>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternError {
    /// Width or height outside `1..=MAX`.
    InvalidDimensions,
    /// Number of encoded rows differs from the declared height.
    RowCount,
    /// An encoded row has a different length than the declared width.
    RowLength,
    /// Input could not be decoded at all.
    Malformed,
}

impl PatternError {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternError::InvalidDimensions => "pattern dimensions out of range",
            PatternError::RowCount => "row count does not match height",
            PatternError::RowLength => "row length does not match width",
            PatternError::Malformed => "malformed pattern",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    name: PatternName,
    width: u8,
    height: u8,
    rows: [u16; MAX_HEIGHT as usize],
}

impl Pattern {
    /// Create a blank pattern with validated dimensions.
    pub fn blank(name: &str, width: u8, height: u8) -> Result<Self, PatternError> {
        if !(1..=MAX_WIDTH).contains(&width) || !(1..=MAX_HEIGHT).contains(&height) {
            return Err(PatternError::InvalidDimensions);
        }
        Ok(Self {
            name: truncated_name(name),
            width,
            height,
            rows: [0; MAX_HEIGHT as usize],
        })
    }

    /// Build a pattern from raw row bitmasks.
    ///
    /// Bits beyond `width` are discarded.
    pub fn from_rows(
        name: &str,
        width: u8,
        height: u8,
        rows: &[u16],
    ) -> Result<Self, PatternError> {
        let mut pattern = Self::blank(name, width, height)?;
        if rows.len() != usize::from(height) {
            return Err(PatternError::RowCount);
        }
        let mask = pattern.column_mask();
        for (slot, bits) in pattern.rows.iter_mut().zip(rows) {
            *slot = bits & mask;
        }
        Ok(pattern)
    }

    /// The pattern synthesized on first boot: a blank full-size grid.
    pub fn default_pattern() -> Self {
        Self {
            name: truncated_name("default"),
            width: MAX_WIDTH,
            height: MAX_HEIGHT,
            rows: [0; MAX_HEIGHT as usize],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Whether the stitch at (`row`, `col`) is on. Out-of-range cells are off.
    pub fn cell(&self, row: u8, col: u8) -> bool {
        row < self.height && col < self.width && self.row_bits(row) & (1 << col) != 0
    }

    /// Row bitmask, or `0` for rows outside the pattern.
    pub fn row_bits(&self, row: u8) -> u16 {
        if row < self.height {
            self.rows[usize::from(row)]
        } else {
            0
        }
    }

    /// Rows in use, top to bottom.
    pub fn rows(&self) -> &[u16] {
        &self.rows[..usize::from(self.height)]
    }

    pub(crate) fn set_cell(&mut self, row: u8, col: u8, on: bool) {
        if row >= self.height || col >= self.width {
            return;
        }
        let slot = &mut self.rows[usize::from(row)];
        if on {
            *slot |= 1 << col;
        } else {
            *slot &= !(1 << col);
        }
    }

    fn column_mask(&self) -> u16 {
        (1u16 << self.width) - 1
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Self::default_pattern()
    }
}

fn truncated_name(name: &str) -> PatternName {
    let mut out = PatternName::new();
    for ch in name.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}
