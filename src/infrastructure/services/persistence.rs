use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::{Channel, Receiver},
};
use knitled_core::{KnitSettings, SettingsStore, StorageError};

use crate::infrastructure::repositories::AppPersistentStorage;

const SETTINGS_CHANNEL_SIZE: usize = 8;

pub type SettingsReceiver =
    Receiver<'static, CriticalSectionRawMutex, KnitSettings, SETTINGS_CHANNEL_SIZE>;

type SettingsChannel = Channel<CriticalSectionRawMutex, KnitSettings, SETTINGS_CHANNEL_SIZE>;

/// Settings waiting for the persistence task.
static PERSISTENCE_CHANNEL: SettingsChannel = Channel::new();

/// [`SettingsStore`] that reads the flash record directly but hands writes
/// to the persistence task, so mutators never wait on flash.
pub struct SettingsPersistenceService {
    storage: AppPersistentStorage,
}

impl SettingsPersistenceService {
    pub fn new(storage: AppPersistentStorage) -> Self {
        Self { storage }
    }
}

impl SettingsStore for SettingsPersistenceService {
    fn load(&mut self) -> Result<Option<KnitSettings>, StorageError> {
        self.storage.load_settings()
    }

    fn save(&mut self, settings: &KnitSettings) -> Result<(), StorageError> {
        PERSISTENCE_CHANNEL
            .try_send(settings.clone())
            .map_err(|_| StorageError::Busy)
    }
}

pub fn get_persistence_receiver() -> SettingsReceiver {
    PERSISTENCE_CHANNEL.receiver()
}
