use bytemuck::{Pod, Zeroable};
#[cfg(feature = "log")]
use esp_println::println;
use knitled_core::{
    MAX_HEIGHT,
    Pattern,
    PatternId,
    PatternList,
    PatternStore,
    StorageError,
    pattern::PatternName,
    ports::MAX_STORED_PATTERNS,
};

use super::persistent_storage::{parse_padded_string, string_to_array};
use crate::{
    config::STORAGE,
    infrastructure::drivers::{BLOCK_SIZE, FlashRecord, FlashStorageMutex},
};

#[derive(Debug, Clone, Copy, Zeroable, Pod)]
#[repr(C)]
struct PersistentPattern {
    id: [u8; 48],
    name: [u8; 32],
    rows: [u16; MAX_HEIGHT as usize],
    width: u8,
    height: u8,
    _padding: [u8; 2],
}

impl PersistentPattern {
    fn new(id: &PatternId, pattern: &Pattern) -> Self {
        let mut rows = [0u16; MAX_HEIGHT as usize];
        rows[..pattern.rows().len()].copy_from_slice(pattern.rows());
        Self {
            id: string_to_array(id.as_str()),
            name: string_to_array(pattern.name()),
            rows,
            width: pattern.width(),
            height: pattern.height(),
            _padding: [0; 2],
        }
    }

    fn id(&self) -> Option<PatternId> {
        let raw = parse_padded_string::<48>(&self.id)?;
        PatternId::normalize(&raw).ok()
    }

    fn pattern(&self) -> Result<Pattern, StorageError> {
        let name: PatternName = parse_padded_string(&self.name).unwrap_or_default();
        let height = usize::from(self.height.min(MAX_HEIGHT));
        Pattern::from_rows(&name, self.width, self.height, &self.rows[..height])
            .map_err(|_| StorageError::Malformed)
    }
}

/// Pattern files in the `patterns` partition, one flash sector per pattern.
pub struct FlashPatternStore {
    slots: [FlashRecord<PersistentPattern>; MAX_STORED_PATTERNS],
}

impl FlashPatternStore {
    pub fn new(flash: &'static FlashStorageMutex) -> Self {
        Self {
            slots: core::array::from_fn(|index| {
                #[allow(clippy::cast_possible_truncation)]
                let offset = index as u32 * BLOCK_SIZE;
                FlashRecord::new(flash, STORAGE.patterns_offset + offset)
            }),
        }
    }

    /// Slot holding `id` and its record.
    fn find(&self, id: &PatternId) -> Result<Option<(usize, PersistentPattern)>, StorageError> {
        for (index, slot) in self.slots.iter().enumerate() {
            match slot.load() {
                Ok(record) if record.id().as_ref() == Some(id) => return Ok(Some((index, record))),
                Ok(_) | Err(StorageError::NotFound | StorageError::Malformed) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(None)
    }

    fn free_slot(&self) -> Result<usize, StorageError> {
        for (index, slot) in self.slots.iter().enumerate() {
            match slot.load() {
                Err(StorageError::NotFound) => return Ok(index),
                Err(StorageError::Malformed) => return Ok(index),
                Ok(record) if record.id().is_none() => return Ok(index),
                Ok(_) => {}
                Err(err) => return Err(err),
            }
        }
        Err(StorageError::Full)
    }
}

impl PatternStore for FlashPatternStore {
    fn load(&mut self, id: &PatternId) -> Result<Pattern, StorageError> {
        let (_, record) = self.find(id)?.ok_or(StorageError::NotFound)?;
        record.pattern()
    }

    fn save(&mut self, id: &PatternId, pattern: &Pattern) -> Result<(), StorageError> {
        let index = match self.find(id)? {
            Some((index, _)) => index,
            None => self.free_slot()?,
        };
        #[cfg(feature = "log")]
        println!("pattern_storage: saving {} to slot {}", id.as_str(), index);
        self.slots[index].save(&PersistentPattern::new(id, pattern))
    }

    fn delete(&mut self, id: &PatternId) -> Result<(), StorageError> {
        let (index, _) = self.find(id)?.ok_or(StorageError::NotFound)?;
        self.slots[index].erase()
    }

    fn list(&mut self) -> Result<PatternList, StorageError> {
        let mut ids = PatternList::new();
        for slot in &self.slots {
            match slot.load() {
                Ok(record) => {
                    if let Some(id) = record.id() {
                        // one entry per slot, so this cannot overflow
                        let _ = ids.push(id);
                    }
                }
                Err(StorageError::NotFound | StorageError::Malformed) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(ids)
    }
}
