//! Pattern storage identifiers
//!
//! Identifiers look like file paths (`/patterns/<name>.json`). Anything the
//! network layer hands us goes through [`PatternId::normalize`] first.

use core::fmt;

use heapless::String;
use serde::{Deserialize, Serialize};

pub const MAX_PATTERN_ID_LEN: usize = 48;
pub const PATTERN_DIR: &str = "/patterns/";
pub const PATTERN_EXTENSION: &str = ".json";
pub const DEFAULT_PATTERN_ID: &str = "/patterns/default.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternIdError {
    Empty,
    TooLong,
}

impl PatternIdError {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternIdError::Empty => "pattern name is empty",
            PatternIdError::TooLong => "pattern name is too long",
        }
    }
}

/// Canonical identifier of a stored pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternId(String<MAX_PATTERN_ID_LEN>);

impl PatternId {
    /// Normalize a user supplied name or path.
    ///
    /// `..` sequences are removed, backslashes become slashes, bare names
    /// are placed under [`PATTERN_DIR`] and the `.json` extension is added
    /// when missing.
    pub fn normalize(raw: &str) -> Result<Self, PatternIdError> {
        let mut cleaned = String::<MAX_PATTERN_ID_LEN>::new();
        let mut rest = raw.trim();
        while !rest.is_empty() {
            if let Some(tail) = rest.strip_prefix("..") {
                rest = tail;
                continue;
            }
            let mut chars = rest.chars();
            let Some(ch) = chars.next() else { break };
            rest = chars.as_str();
            let ch = if ch == '\\' { '/' } else { ch };
            if cleaned.push(ch).is_err() {
                return Err(PatternIdError::TooLong);
            }
        }

        let name = cleaned
            .strip_prefix(PATTERN_DIR)
            .unwrap_or(cleaned.as_str())
            .trim_start_matches('/');
        let name = name.strip_suffix(PATTERN_EXTENSION).unwrap_or(name);
        if name.is_empty() || name.chars().all(|ch| ch == '/' || ch == '.') {
            return Err(PatternIdError::Empty);
        }

        let mut id = String::new();
        id.push_str(PATTERN_DIR)
            .and_then(|()| id.push_str(name))
            .and_then(|()| id.push_str(PATTERN_EXTENSION))
            .map_err(|()| PatternIdError::TooLong)?;
        Ok(Self(id))
    }

    pub fn default_id() -> Self {
        let mut id = String::new();
        // DEFAULT_PATTERN_ID always fits
        let _ = id.push_str(DEFAULT_PATTERN_ID);
        Self(id)
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_PATTERN_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name without directory and extension, used as a display fallback.
    pub fn stem(&self) -> &str {
        let name = self.0.strip_prefix(PATTERN_DIR).unwrap_or(&self.0);
        name.strip_suffix(PATTERN_EXTENSION).unwrap_or(name)
    }
}

impl Default for PatternId {
    fn default() -> Self {
        Self::default_id()
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
