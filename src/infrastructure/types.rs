use knitled_core::{KnitController, OutputStage};

use crate::{
    config::LED_COUNT,
    infrastructure::{
        drivers::{EspLedStrip, OledStatusDisplay},
        repositories::FlashPatternStore,
        services::SettingsPersistenceService,
    },
};

pub type KnitControllerImpl = KnitController<SettingsPersistenceService, FlashPatternStore>;

pub type KnitOutputStage = OutputStage<EspLedStrip, OledStatusDisplay, LED_COUNT>;
