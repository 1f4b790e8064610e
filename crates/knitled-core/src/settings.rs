//! Configuration state
//!
//! [`KnitSettings`] is the persisted part of the controller state. The
//! transient warning flag lives on the controller itself.

use serde::{Deserialize, Serialize};
use smart_leds::RGB8;

use crate::pattern_id::PatternId;

/// Color packed as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackedColor(u32);

impl PackedColor {
    pub const BLACK: Self = Self(0);

    /// Create a color, discarding anything above the low 24 bits.
    pub const fn new(packed: u32) -> Self {
        Self(packed & 0x00FF_FFFF)
    }

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub const fn packed(self) -> u32 {
        self.0
    }

    #[allow(clippy::cast_possible_truncation)]
    pub const fn to_rgb8(self) -> RGB8 {
        RGB8 {
            r: (self.0 >> 16) as u8,
            g: (self.0 >> 8) as u8,
            b: self.0 as u8,
        }
    }

    /// Scale every channel by `brightness / 255`.
    pub fn dimmed(self, brightness: u8) -> RGB8 {
        let RGB8 { r, g, b } = self.to_rgb8();
        RGB8 {
            r: scale_channel(r, brightness),
            g: scale_channel(g, brightness),
            b: scale_channel(b, brightness),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn scale_channel(value: u8, brightness: u8) -> u8 {
    (u16::from(value) * u16::from(brightness) / 255) as u8
}

pub const DEFAULT_COLOR_ACTIVE: PackedColor = PackedColor::new(0x00FF00);
pub const DEFAULT_COLOR_CONFIRMED: PackedColor = PackedColor::new(0x0000FF);
pub const DEFAULT_COLOR_INACTIVE: PackedColor = PackedColor::BLACK;
pub const DEFAULT_BRIGHTNESS: u8 = 64;

/// Persisted configuration and progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnitSettings {
    pub color_active: PackedColor,
    pub color_confirmed: PackedColor,
    /// Color of "off" cells. Black leaves them unlit.
    pub color_inactive: PackedColor,
    pub brightness: u8,
    pub auto_advance: bool,
    pub blink_warning: bool,
    pub row_from_bottom: bool,
    pub active_row: u8,
    pub total_pulses: u32,
    pub pattern_id: PatternId,
}

impl Default for KnitSettings {
    fn default() -> Self {
        Self {
            color_active: DEFAULT_COLOR_ACTIVE,
            color_confirmed: DEFAULT_COLOR_CONFIRMED,
            color_inactive: DEFAULT_COLOR_INACTIVE,
            brightness: DEFAULT_BRIGHTNESS,
            auto_advance: true,
            blink_warning: true,
            row_from_bottom: false,
            active_row: 0,
            total_pulses: 0,
            pattern_id: PatternId::default_id(),
        }
    }
}

impl KnitSettings {
    /// Apply the fields present in `patch`.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(color) = patch.color_active {
            self.color_active = PackedColor::new(color);
        }
        if let Some(color) = patch.color_confirmed {
            self.color_confirmed = PackedColor::new(color);
        }
        if let Some(color) = patch.color_inactive {
            self.color_inactive = PackedColor::new(color);
        }
        if let Some(brightness) = patch.brightness {
            self.brightness = clamp_brightness(brightness);
        }
        if let Some(auto_advance) = patch.auto_advance {
            self.auto_advance = auto_advance;
        }
        if let Some(blink_warning) = patch.blink_warning {
            self.blink_warning = blink_warning;
        }
        if let Some(row_from_bottom) = patch.row_from_bottom {
            self.row_from_bottom = row_from_bottom;
        }
    }

    pub fn config(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            color_active: self.color_active,
            color_confirmed: self.color_confirmed,
            color_inactive: self.color_inactive,
            brightness: self.brightness,
            auto_advance: self.auto_advance,
            blink_warning: self.blink_warning,
            row_from_bottom: self.row_from_bottom,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_brightness(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Partial configuration update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsPatch {
    pub color_active: Option<u32>,
    pub color_confirmed: Option<u32>,
    pub color_inactive: Option<u32>,
    /// Clamped into `0..=255` when applied.
    pub brightness: Option<i32>,
    pub auto_advance: Option<bool>,
    pub blink_warning: Option<bool>,
    pub row_from_bottom: Option<bool>,
}

/// User editable configuration as reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSnapshot {
    pub color_active: PackedColor,
    pub color_confirmed: PackedColor,
    pub color_inactive: PackedColor,
    pub brightness: u8,
    pub auto_advance: bool,
    pub blink_warning: bool,
    pub row_from_bottom: bool,
}
