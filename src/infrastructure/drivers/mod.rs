mod flash_storage;
mod led_ws2812;
mod oled;
mod touch;
mod wifi;

pub(crate) use flash_storage::{BLOCK_SIZE, FlashRecord};
pub use flash_storage::{FlashStorageMutex, init_flash_storage};
pub use led_ws2812::EspLedStrip;
pub use oled::OledStatusDisplay;
pub use touch::EspTouchReader;
pub use wifi::{NetworkMode, start_network};
