use bytemuck::{Pod, Zeroable};
use heapless::String;
use knitled_core::{KnitSettings, PackedColor, PatternId, StorageError};

use crate::{
    config::{STORAGE, WifiCredentials},
    infrastructure::drivers::{FlashRecord, FlashStorageMutex},
};

const FLAG_AUTO_ADVANCE: u8 = 1 << 0;
const FLAG_BLINK_WARNING: u8 = 1 << 1;
const FLAG_ROW_FROM_BOTTOM: u8 = 1 << 2;

#[derive(Debug, Clone, Copy, Zeroable, Pod)]
#[repr(C)]
struct PersistentKnitSettings {
    color_active: u32,
    color_confirmed: u32,
    color_inactive: u32,
    total_pulses: u32,
    brightness: u8,
    flags: u8,
    active_row: u8,
    _padding: u8,
    pattern_id: [u8; 48],
}

impl From<&KnitSettings> for PersistentKnitSettings {
    fn from(settings: &KnitSettings) -> Self {
        let mut flags = 0;
        if settings.auto_advance {
            flags |= FLAG_AUTO_ADVANCE;
        }
        if settings.blink_warning {
            flags |= FLAG_BLINK_WARNING;
        }
        if settings.row_from_bottom {
            flags |= FLAG_ROW_FROM_BOTTOM;
        }
        Self {
            color_active: settings.color_active.packed(),
            color_confirmed: settings.color_confirmed.packed(),
            color_inactive: settings.color_inactive.packed(),
            total_pulses: settings.total_pulses,
            brightness: settings.brightness,
            flags,
            active_row: settings.active_row,
            _padding: 0,
            pattern_id: string_to_array(settings.pattern_id.as_str()),
        }
    }
}

impl From<&PersistentKnitSettings> for KnitSettings {
    fn from(stored: &PersistentKnitSettings) -> Self {
        let pattern_id = parse_padded_string::<48>(&stored.pattern_id)
            .and_then(|id| PatternId::normalize(&id).ok())
            .unwrap_or_default();
        Self {
            color_active: PackedColor::new(stored.color_active),
            color_confirmed: PackedColor::new(stored.color_confirmed),
            color_inactive: PackedColor::new(stored.color_inactive),
            brightness: stored.brightness,
            auto_advance: stored.flags & FLAG_AUTO_ADVANCE != 0,
            blink_warning: stored.flags & FLAG_BLINK_WARNING != 0,
            row_from_bottom: stored.flags & FLAG_ROW_FROM_BOTTOM != 0,
            active_row: stored.active_row,
            total_pulses: stored.total_pulses,
            pattern_id,
        }
    }
}

#[derive(Debug, Clone, Copy, Zeroable, Pod)]
#[repr(C)]
struct PersistentWifiConfig {
    ssid: [u8; 32],
    password: [u8; 64],
}

impl From<&WifiCredentials> for PersistentWifiConfig {
    fn from(credentials: &WifiCredentials) -> Self {
        Self {
            ssid: string_to_array(&credentials.ssid),
            password: string_to_array(&credentials.password),
        }
    }
}

impl PersistentWifiConfig {
    fn credentials(&self) -> Option<WifiCredentials> {
        let ssid = parse_padded_string(&self.ssid)?;
        if ssid.is_empty() {
            return None;
        }
        Some(WifiCredentials {
            ssid,
            password: parse_padded_string(&self.password)?,
        })
    }
}

#[derive(Debug, Clone, Copy, Zeroable, Pod)]
#[repr(C)]
pub struct AppPersistentData {
    settings: PersistentKnitSettings,
    wifi: PersistentWifiConfig,
}

impl Default for AppPersistentData {
    fn default() -> Self {
        Self {
            settings: PersistentKnitSettings::from(&KnitSettings::default()),
            wifi: PersistentWifiConfig::zeroed(),
        }
    }
}

/// The settings record in the `knit_state` partition. Knitting settings and
/// Wi-Fi credentials share it; each update rewrites the whole record.
#[derive(Clone, Copy)]
pub struct AppPersistentStorage {
    record: FlashRecord<AppPersistentData>,
}

impl AppPersistentStorage {
    pub fn new(flash: &'static FlashStorageMutex) -> Self {
        Self {
            record: FlashRecord::new(flash, STORAGE.settings_offset),
        }
    }

    /// Stored record, or [`None`] on first boot.
    fn read(&self) -> Result<Option<AppPersistentData>, StorageError> {
        match self.record.load() {
            Ok(data) => Ok(Some(data)),
            Err(StorageError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn update(&self, op: impl FnOnce(&mut AppPersistentData)) -> Result<(), StorageError> {
        let mut data = self.read().ok().flatten().unwrap_or_default();
        op(&mut data);
        self.record.save(&data)
    }

    pub fn load_settings(&self) -> Result<Option<KnitSettings>, StorageError> {
        Ok(self.read()?.map(|data| KnitSettings::from(&data.settings)))
    }

    pub fn save_settings(&self, settings: &KnitSettings) -> Result<(), StorageError> {
        self.update(|data| data.settings = settings.into())
    }

    pub fn load_wifi(&self) -> Option<WifiCredentials> {
        self.read().ok().flatten()?.wifi.credentials()
    }

    pub fn save_wifi(&self, credentials: &WifiCredentials) -> Result<(), StorageError> {
        self.update(|data| data.wifi = credentials.into())
    }
}

/// Read a zero padded UTF-8 string.
pub(super) fn parse_padded_string<const N: usize>(bytes: &[u8]) -> Option<String<N>> {
    let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let text = core::str::from_utf8(&bytes[..len]).ok()?;
    let mut out = String::new();
    out.push_str(text).ok()?;
    Some(out)
}

/// Copy a string into a zero padded array, cutting it at `N` bytes.
pub(super) fn string_to_array<const N: usize>(s: &str) -> [u8; N] {
    let mut arr = [0u8; N];
    let bytes = s.as_bytes();
    let len = bytes.len().min(N);
    arr[..len].copy_from_slice(&bytes[..len]);
    arr
}
