//! Seams between the control core and the hardware.

use heapless::Vec;
use smart_leds::RGB8;

use crate::{
    pattern::Pattern,
    pattern_id::PatternId,
    render::StatusLines,
    settings::KnitSettings,
};

/// Maximum number of stored patterns reported by a listing.
pub const MAX_STORED_PATTERNS: usize = 16;

pub type PatternList = Vec<PatternId, MAX_STORED_PATTERNS>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    NotFound,
    /// Stored data exists but cannot be decoded.
    Malformed,
    /// No free slot left.
    Full,
    /// The write queue is saturated.
    Busy,
    Driver,
}

impl StorageError {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageError::NotFound => "not found",
            StorageError::Malformed => "stored data is malformed",
            StorageError::Full => "storage is full",
            StorageError::Busy => "storage is busy",
            StorageError::Driver => "storage driver error",
        }
    }
}

/// Durable pattern files.
pub trait PatternStore {
    fn load(&mut self, id: &PatternId) -> Result<Pattern, StorageError>;
    fn save(&mut self, id: &PatternId, pattern: &Pattern) -> Result<(), StorageError>;
    fn delete(&mut self, id: &PatternId) -> Result<(), StorageError>;
    fn list(&mut self) -> Result<PatternList, StorageError>;
}

/// Durable configuration record.
pub trait SettingsStore {
    /// `Ok(None)` means nothing was stored yet.
    fn load(&mut self) -> Result<Option<KnitSettings>, StorageError>;
    fn save(&mut self, settings: &KnitSettings) -> Result<(), StorageError>;
}

/// Addressable LED strip.
pub trait LedStrip {
    fn write(&mut self, colors: &[RGB8]);
}

/// Small text display.
pub trait StatusDisplay {
    fn show(&mut self, lines: &StatusLines);
}
