//! Knit controller
//!
//! The controller owns the pattern, the confirmation table and the settings.
//! Every change happens through one of its named operations, which keep the
//! active row in range and persist the settings in one place.
//!
//! Storage failures are logged and otherwise ignored: the in-memory state
//! stays authoritative for the running session.

use serde::Serialize;

use crate::{
    confirmation::ConfirmationTable,
    error::KnitError,
    pattern::Pattern,
    pattern_id::PatternId,
    ports::{PatternList, PatternStore, SettingsStore, StorageError},
    settings::{ConfigSnapshot, KnitSettings, PackedColor, SettingsPatch},
    stepping::{RowDelta, display_row_number, step_row},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Restore the carriage pulse counter from storage at boot.
    pub persist_pulse_count: bool,
}

/// Operation requested by a physical input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    PreviousRow,
    NextRow,
    Confirm,
    CarriagePulse,
}

/// Everything the LED strip and the status display depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnitView {
    pub active_row: u8,
    pub width: u8,
    pub height: u8,
    pub row_cells: u16,
    pub row_confirmed: bool,
    pub total_pulses: u32,
    pub warn_blink_active: bool,
    pub blink_warning: bool,
    pub row_from_bottom: bool,
    pub brightness: u8,
    pub color_active: PackedColor,
    pub color_confirmed: PackedColor,
    pub color_inactive: PackedColor,
}

impl KnitView {
    pub fn display_row(&self) -> u8 {
        display_row_number(self.active_row, self.height, self.row_from_bottom)
    }

    /// Whether the warning blink should currently run.
    pub fn blinking(&self) -> bool {
        self.warn_blink_active && self.blink_warning
    }

    pub fn cell(&self, col: u8) -> bool {
        col < self.width && self.row_cells & (1 << col) != 0
    }
}

/// State snapshot polled by the web UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub active_row: u8,
    pub display_row: u8,
    pub total_pulses: u32,
    pub w: u8,
    pub h: u8,
    pub warn: bool,
    pub confirmed: bool,
    pub auto_advance: bool,
    pub blink_warning: bool,
    pub row_from_bottom: bool,
    pub brightness: u8,
    pub color_active: PackedColor,
    pub color_confirmed: PackedColor,
    pub color_inactive: PackedColor,
    pub file: PatternId,
}

pub struct KnitController<S: SettingsStore, P: PatternStore> {
    settings: KnitSettings,
    pattern: Pattern,
    confirmed: ConfirmationTable,
    warn_blink_active: bool,
    settings_store: S,
    pattern_store: P,
}

impl<S: SettingsStore, P: PatternStore> KnitController<S, P> {
    /// Restore the controller from storage.
    ///
    /// Missing or unreadable settings fall back to defaults. A missing
    /// pattern is replaced by the default pattern, which is written back so
    /// the next boot finds it.
    pub fn restore(mut settings_store: S, mut pattern_store: P, options: ControllerOptions) -> Self {
        let mut settings = match settings_store.load() {
            Ok(Some(settings)) => settings,
            Ok(None) => KnitSettings::default(),
            Err(err) => {
                log::warn!("knit: cannot load settings: {}", err.as_str());
                KnitSettings::default()
            }
        };
        if !options.persist_pulse_count {
            settings.total_pulses = 0;
        }

        let pattern = match pattern_store.load(&settings.pattern_id) {
            Ok(pattern) => pattern,
            Err(err) => {
                log::warn!(
                    "knit: cannot load {}: {}, using default",
                    settings.pattern_id,
                    err.as_str()
                );
                settings.pattern_id = PatternId::default_id();
                let pattern = pattern_store
                    .load(&settings.pattern_id)
                    .unwrap_or_else(|_| Pattern::default_pattern());
                if let Err(err) = pattern_store.save(&settings.pattern_id, &pattern) {
                    log::warn!("knit: cannot store default pattern: {}", err.as_str());
                }
                pattern
            }
        };

        let mut controller = Self {
            settings,
            pattern,
            confirmed: ConfirmationTable::new(),
            warn_blink_active: false,
            settings_store,
            pattern_store,
        };
        controller.clamp_active_row();
        controller
    }

    pub fn settings(&self) -> &KnitSettings {
        &self.settings
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn confirmations(&self) -> &ConfirmationTable {
        &self.confirmed
    }

    pub fn active_row(&self) -> u8 {
        self.settings.active_row
    }

    pub fn warn_blink_active(&self) -> bool {
        self.warn_blink_active
    }

    /// Move one row in the requested direction and clear the warning.
    pub fn row_step(&mut self, delta: RowDelta) -> u8 {
        self.warn_blink_active = false;
        self.advance(delta);
        self.persist();
        self.settings.active_row
    }

    /// Mark the active row as knitted.
    pub fn confirm(&mut self) -> u8 {
        if self.pattern.height() == 0 {
            return self.settings.active_row;
        }
        self.confirmed.confirm(self.settings.active_row);
        self.warn_blink_active = false;
        if self.settings.auto_advance {
            return self.row_step(RowDelta::Forward);
        }
        self.persist();
        self.settings.active_row
    }

    /// The carriage passed: count it, warn when the row was not confirmed
    /// and always move forward.
    pub fn carriage_pulse(&mut self) -> u8 {
        self.settings.total_pulses = self.settings.total_pulses.wrapping_add(1);
        if self.settings.blink_warning && !self.confirmed.is_confirmed(self.settings.active_row) {
            self.warn_blink_active = true;
        }
        self.advance(RowDelta::Forward);
        self.persist();
        self.settings.active_row
    }

    /// Replace the active pattern.
    pub fn load_pattern(&mut self, id: PatternId, pattern: Pattern) {
        log::info!("knit: loaded {} ({}x{})", id, pattern.width(), pattern.height());
        self.pattern = pattern;
        self.confirmed.reset();
        self.settings.pattern_id = id;
        self.clamp_active_row();
        self.persist();
    }

    pub fn update_config(&mut self, patch: &SettingsPatch) -> ConfigSnapshot {
        self.settings.apply(patch);
        self.persist();
        self.settings.config()
    }

    /// Row step requested over the network. Deltas outside `-1..=1` are
    /// rejected without touching the state.
    pub fn step_from_network(&mut self, delta: i32) -> Result<u8, KnitError> {
        let delta = RowDelta::try_from(delta)?;
        Ok(self.row_step(delta))
    }

    pub fn handle_input(&mut self, action: InputAction) {
        match action {
            InputAction::PreviousRow => {
                self.row_step(RowDelta::Back);
            }
            InputAction::NextRow => {
                self.row_step(RowDelta::Forward);
            }
            InputAction::Confirm => {
                self.confirm();
            }
            InputAction::CarriagePulse => {
                self.carriage_pulse();
            }
        }
    }

    /// Make `id` the active pattern.
    ///
    /// An id with nothing stored yet is created from the current pattern.
    pub fn select_pattern(&mut self, id: PatternId) -> Result<(), KnitError> {
        let pattern = match self.pattern_store.load(&id) {
            Ok(pattern) => pattern,
            Err(StorageError::NotFound) => {
                self.pattern_store.save(&id, &self.pattern)?;
                self.pattern.clone()
            }
            Err(err) => return Err(err.into()),
        };
        self.load_pattern(id, pattern);
        Ok(())
    }

    /// Store `pattern` under `id` and make it active.
    pub fn save_pattern(&mut self, id: PatternId, pattern: Pattern) -> Result<(), KnitError> {
        self.pattern_store.save(&id, &pattern)?;
        self.load_pattern(id, pattern);
        Ok(())
    }

    /// Store `pattern` under `id` without changing the active pattern.
    pub fn store_pattern(&mut self, id: &PatternId, pattern: &Pattern) -> Result<(), KnitError> {
        self.pattern_store.save(id, pattern)?;
        Ok(())
    }

    pub fn read_pattern(&mut self, id: &PatternId) -> Result<Pattern, KnitError> {
        Ok(self.pattern_store.load(id)?)
    }

    pub fn delete_pattern(&mut self, id: &PatternId) -> Result<(), KnitError> {
        if id.is_default() {
            return Err(KnitError::ProtectedPattern);
        }
        self.pattern_store.delete(id)?;
        Ok(())
    }

    pub fn list_patterns(&mut self) -> Result<PatternList, KnitError> {
        Ok(self.pattern_store.list()?)
    }

    pub fn view(&self) -> KnitView {
        let row = self.settings.active_row;
        KnitView {
            active_row: row,
            width: self.pattern.width(),
            height: self.pattern.height(),
            row_cells: self.pattern.row_bits(row),
            row_confirmed: self.confirmed.is_confirmed(row),
            total_pulses: self.settings.total_pulses,
            warn_blink_active: self.warn_blink_active,
            blink_warning: self.settings.blink_warning,
            row_from_bottom: self.settings.row_from_bottom,
            brightness: self.settings.brightness,
            color_active: self.settings.color_active,
            color_confirmed: self.settings.color_confirmed,
            color_inactive: self.settings.color_inactive,
        }
    }

    pub fn snapshot(&self) -> StateSnapshot {
        let view = self.view();
        StateSnapshot {
            active_row: view.active_row,
            display_row: view.display_row(),
            total_pulses: view.total_pulses,
            w: view.width,
            h: view.height,
            warn: view.warn_blink_active,
            confirmed: view.row_confirmed,
            auto_advance: self.settings.auto_advance,
            blink_warning: view.blink_warning,
            row_from_bottom: view.row_from_bottom,
            brightness: view.brightness,
            color_active: view.color_active,
            color_confirmed: view.color_confirmed,
            color_inactive: view.color_inactive,
            file: self.settings.pattern_id.clone(),
        }
    }

    fn advance(&mut self, delta: RowDelta) {
        self.settings.active_row = step_row(
            self.settings.active_row,
            self.pattern.height(),
            delta,
            self.settings.row_from_bottom,
        );
    }

    fn clamp_active_row(&mut self) {
        let last = self.pattern.height().saturating_sub(1);
        self.settings.active_row = self.settings.active_row.min(last);
    }

    fn persist(&mut self) {
        if let Err(err) = self.settings_store.save(&self.settings) {
            log::warn!("knit: cannot persist settings: {}", err.as_str());
        }
    }
}
