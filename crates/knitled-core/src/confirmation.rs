use crate::pattern::MAX_HEIGHT;

/// Per-row "knitted" flags, sized to the largest possible pattern.
///
/// Entries past the current pattern height are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationTable {
    rows: [bool; MAX_HEIGHT as usize],
}

impl ConfirmationTable {
    pub const fn new() -> Self {
        Self {
            rows: [false; MAX_HEIGHT as usize],
        }
    }

    pub fn reset(&mut self) {
        self.rows = [false; MAX_HEIGHT as usize];
    }

    pub fn confirm(&mut self, row: u8) {
        if let Some(slot) = self.rows.get_mut(usize::from(row)) {
            *slot = true;
        }
    }

    pub fn is_confirmed(&self, row: u8) -> bool {
        self.rows.get(usize::from(row)).copied().unwrap_or(false)
    }

    /// Flags for the first `height` rows.
    pub fn rows(&self, height: u8) -> &[bool] {
        let end = usize::from(height.min(MAX_HEIGHT));
        &self.rows[..end]
    }
}

impl Default for ConfirmationTable {
    fn default() -> Self {
        Self::new()
    }
}
