//! Pattern JSON format
//!
//! ```json
//! {"name":"heart","w":4,"h":2,"pixels":["0110","1001"]}
//! ```
//!
//! Each string in `pixels` is one row, top first. `'1'` marks a stitch that
//! is on; any other character is off.

use heapless::{String, Vec};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::pattern::{MAX_HEIGHT, MAX_WIDTH, Pattern, PatternError, PatternName};

pub type PixelRow = String<{ MAX_WIDTH as usize }>;
pub type PixelRows = Vec<PixelRow, { MAX_HEIGHT as usize }>;

/// Wire representation of a [`Pattern`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternDocument {
    #[serde(default)]
    pub name: PatternName,
    pub w: u8,
    pub h: u8,
    pub pixels: PixelRows,
}

impl From<&Pattern> for PatternDocument {
    fn from(pattern: &Pattern) -> Self {
        let mut pixels = PixelRows::new();
        for row in 0..pattern.height() {
            let mut line = PixelRow::new();
            for col in 0..pattern.width() {
                // width never exceeds the row capacity
                let _ = line.push(if pattern.cell(row, col) { '1' } else { '0' });
            }
            let _ = pixels.push(line);
        }
        let mut name = PatternName::new();
        let _ = name.push_str(pattern.name());
        Self {
            name,
            w: pattern.width(),
            h: pattern.height(),
            pixels,
        }
    }
}

impl TryFrom<&PatternDocument> for Pattern {
    type Error = PatternError;

    fn try_from(doc: &PatternDocument) -> Result<Self, Self::Error> {
        let mut pattern = Pattern::blank(&doc.name, doc.w, doc.h)?;
        if doc.pixels.len() != usize::from(doc.h) {
            return Err(PatternError::RowCount);
        }
        for (row, line) in (0u8..).zip(doc.pixels.iter()) {
            if line.chars().count() != usize::from(doc.w) {
                return Err(PatternError::RowLength);
            }
            for (col, ch) in (0u8..).zip(line.chars()) {
                pattern.set_cell(row, col, ch == '1');
            }
        }
        Ok(pattern)
    }
}

/// Longest string value, after unescaping, that [`decode_json`] accepts.
pub const MAX_JSON_STRING: usize = 128;

/// Deserialize a JSON document, resolving escape sequences in strings.
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, serde_json_core::de::Error> {
    let mut scratch = [0u8; MAX_JSON_STRING];
    serde_json_core::from_slice_escaped(bytes, &mut scratch).map(|(value, _)| value)
}

/// Decode and validate a pattern from JSON bytes.
pub fn decode_pattern(bytes: &[u8]) -> Result<Pattern, PatternError> {
    let doc = decode_json::<PatternDocument>(bytes).map_err(|_| PatternError::Malformed)?;
    Pattern::try_from(&doc)
}

/// Encode a pattern into `buf`, returning the number of bytes written.
pub fn encode_pattern(pattern: &Pattern, buf: &mut [u8]) -> Result<usize, PatternError> {
    serde_json_core::to_slice(&PatternDocument::from(pattern), buf)
        .map_err(|_| PatternError::Malformed)
}
