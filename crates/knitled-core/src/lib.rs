#![no_std]

//! KnittLED core - row tracking for a knitting-machine LED guide
//!
//! Layers:
//! - `pattern`, `confirmation`, `settings` - the state data model
//! - `stepping` - row wraparound rules
//! - `controller` - the state owner and every named mutation
//! - `blink`, `sync`, `render`, `output` - turning state into LED/display output
//! - `debounce` - edge-triggered physical inputs
//! - `ports` - storage and output seams implemented by the firmware
//! - `codec`, `pattern_id` - wire format and identifier rules used by the HTTP API
//! - `captive` - DNS answers, scan results and input cleanup for the setup access point
//!
//! Nothing in this crate touches hardware directly, so the whole control core
//! runs in host tests.

pub mod blink;
pub mod captive;
pub mod codec;
pub mod confirmation;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod output;
pub mod pattern;
pub mod pattern_id;
pub mod ports;
pub mod render;
pub mod settings;
pub mod stepping;
pub mod sync;

pub use blink::{BlinkPhase, WarningBlink};
pub use confirmation::ConfirmationTable;
pub use controller::{ControllerOptions, InputAction, KnitController, KnitView, StateSnapshot};
pub use debounce::{Activation, Debouncer, EdgeInput, PullUpPin, Sampler, TouchPad, TouchReader};
pub use error::KnitError;
pub use output::OutputStage;
pub use pattern::{MAX_HEIGHT, MAX_WIDTH, Pattern, PatternError};
pub use pattern_id::{DEFAULT_PATTERN_ID, PatternId, PatternIdError};
pub use ports::{LedStrip, PatternList, PatternStore, SettingsStore, StatusDisplay, StorageError};
pub use render::{StatusIndicator, StatusLines, StatusScreen};
pub use settings::{ConfigSnapshot, KnitSettings, PackedColor, SettingsPatch};
pub use stepping::{RowDelta, display_row_number, step_row};
pub use sync::OutputSynchronizer;
