use embassy_futures::select::{Either, select};
use embassy_time::Timer;
#[cfg(feature = "log")]
use esp_println::println;
use knitled_core::KnitSettings;

use crate::{
    config::STORAGE,
    infrastructure::{repositories::AppPersistentStorage, services::SettingsReceiver},
};

/// Write settings to flash once they stop changing for the debounce period.
#[embassy_executor::task]
pub async fn persistence_task(storage: AppPersistentStorage, receiver: SettingsReceiver) {
    #[cfg(feature = "log")]
    println!("persistence: starting persistence task");
    let mut pending: Option<KnitSettings> = None;

    loop {
        match pending.take() {
            None => pending = Some(receiver.receive().await),
            Some(settings) => match select(receiver.receive(), Timer::after(STORAGE.write_debounce)).await {
                Either::First(newer) => pending = Some(newer),
                Either::Second(()) => {
                    if let Err(_e) = storage.save_settings(&settings) {
                        #[cfg(feature = "log")]
                        println!("persistence: write failed: {}", _e.as_str());
                    }
                }
            },
        }
    }
}
