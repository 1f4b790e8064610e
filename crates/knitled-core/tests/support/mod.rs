//! In-memory fakes for the core ports.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin};
use knitled_core::ports::{
    LedStrip, PatternList, PatternStore, SettingsStore, StatusDisplay, StorageError,
};
use knitled_core::{KnitSettings, Pattern, PatternId, StatusLines};
use smart_leds::RGB8;

/// Settings store that remembers every save. Clones share the same record.
#[derive(Clone, Default)]
pub struct MemorySettings {
    pub stored: Rc<RefCell<Option<KnitSettings>>>,
    pub saves: Rc<Cell<usize>>,
    pub fail_writes: Rc<Cell<bool>>,
}

impl MemorySettings {
    pub fn with(settings: KnitSettings) -> Self {
        let store = Self::default();
        *store.stored.borrow_mut() = Some(settings);
        store
    }

    pub fn last(&self) -> Option<KnitSettings> {
        self.stored.borrow().clone()
    }
}

impl SettingsStore for MemorySettings {
    fn load(&mut self) -> Result<Option<KnitSettings>, StorageError> {
        Ok(self.stored.borrow().clone())
    }

    fn save(&mut self, settings: &KnitSettings) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::Driver);
        }
        self.saves.set(self.saves.get() + 1);
        *self.stored.borrow_mut() = Some(settings.clone());
        Ok(())
    }
}

/// Pattern store backed by a vector. Clones share the same files.
#[derive(Clone, Default)]
pub struct MemoryPatterns {
    pub files: Rc<RefCell<Vec<(PatternId, Pattern)>>>,
}

impl MemoryPatterns {
    pub fn with(id: &str, pattern: Pattern) -> Self {
        let store = Self::default();
        store.insert(id, pattern);
        store
    }

    pub fn insert(&self, id: &str, pattern: Pattern) {
        let id = PatternId::normalize(id).unwrap();
        self.files.borrow_mut().push((id, pattern));
    }

    pub fn contains(&self, id: &str) -> bool {
        let id = PatternId::normalize(id).unwrap();
        self.files.borrow().iter().any(|(stored, _)| *stored == id)
    }
}

impl PatternStore for MemoryPatterns {
    fn load(&mut self, id: &PatternId) -> Result<Pattern, StorageError> {
        self.files
            .borrow()
            .iter()
            .find(|(stored, _)| stored == id)
            .map(|(_, pattern)| pattern.clone())
            .ok_or(StorageError::NotFound)
    }

    fn save(&mut self, id: &PatternId, pattern: &Pattern) -> Result<(), StorageError> {
        let mut files = self.files.borrow_mut();
        if let Some(entry) = files.iter_mut().find(|(stored, _)| stored == id) {
            entry.1 = pattern.clone();
        } else {
            files.push((id.clone(), pattern.clone()));
        }
        Ok(())
    }

    fn delete(&mut self, id: &PatternId) -> Result<(), StorageError> {
        let mut files = self.files.borrow_mut();
        let before = files.len();
        files.retain(|(stored, _)| stored != id);
        if files.len() == before {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    fn list(&mut self) -> Result<PatternList, StorageError> {
        let mut list = PatternList::new();
        for (id, _) in self.files.borrow().iter() {
            list.push(id.clone()).map_err(|_| StorageError::Full)?;
        }
        Ok(list)
    }
}

/// LED strip recording every frame written.
#[derive(Clone, Default)]
pub struct RecordingStrip {
    pub frames: Rc<RefCell<Vec<Vec<RGB8>>>>,
}

impl RecordingStrip {
    pub fn writes(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn last(&self) -> Vec<RGB8> {
        self.frames.borrow().last().cloned().unwrap_or_default()
    }
}

impl LedStrip for RecordingStrip {
    fn write(&mut self, colors: &[RGB8]) {
        self.frames.borrow_mut().push(colors.to_vec());
    }
}

/// Display recording every screen shown.
#[derive(Clone, Default)]
pub struct RecordingDisplay {
    pub screens: Rc<RefCell<Vec<StatusLines>>>,
}

impl RecordingDisplay {
    pub fn shows(&self) -> usize {
        self.screens.borrow().len()
    }

    pub fn last(&self) -> StatusLines {
        self.screens.borrow().last().cloned().unwrap_or_default()
    }
}

impl StatusDisplay for RecordingDisplay {
    fn show(&mut self, lines: &StatusLines) {
        self.screens.borrow_mut().push(lines.clone());
    }
}

/// Input pin whose level is driven by the test.
#[derive(Clone)]
pub struct FakePin {
    pub high: Rc<Cell<bool>>,
}

impl FakePin {
    pub fn new(high: bool) -> Self {
        Self {
            high: Rc::new(Cell::new(high)),
        }
    }

    pub fn set_high(&self, high: bool) {
        self.high.set(high);
    }
}

impl ErrorType for FakePin {
    type Error = core::convert::Infallible;
}

impl InputPin for FakePin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high.get())
    }
}

/// Pattern with the given rows (bit `c` = column `c`).
pub fn pattern(width: u8, height: u8, rows: &[u16]) -> Pattern {
    Pattern::from_rows("test", width, height, rows).unwrap()
}
