mod pattern_storage;
mod persistent_storage;

pub use pattern_storage::FlashPatternStore;
pub use persistent_storage::{AppPersistentData, AppPersistentStorage};
