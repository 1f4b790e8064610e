#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::{clock::CpuClock, timer::timg::TimerGroup};
#[cfg(feature = "log")]
use esp_println::println;
use knitled::{
    config::PERSIST_PULSE_COUNT,
    controllers::init_controllers,
    infrastructure::{
        adapters::{init_inputs, init_outputs},
        drivers::{NetworkMode, init_flash_storage, start_network},
        repositories::{AppPersistentStorage, FlashPatternStore},
        services::{
            ProvisioningEvent,
            SettingsPersistenceService,
            get_persistence_receiver,
            next_provisioning_event,
        },
        tasks::{control_loop_task, knit_http_task, persistence_task, provisioning_http_task},
    },
};
use knitled_core::{ControllerOptions, KnitController};

esp_bootloader_esp_idf::esp_app_desc!();

/// Time for the HTTP response to reach the client before a restart.
const RESTART_DELAY: Duration = Duration::from_millis(500);

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();

    // Initialize hardware
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Allocate heap memory (64 + 32 KB)
    esp_alloc::heap_allocator!(
        #[unsafe(link_section = ".dram2_uninit")] size: 64 * 1024
    );
    esp_alloc::heap_allocator!(size: 32 * 1024);

    // Start rtos
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // Storage and the background writer
    let flash = init_flash_storage(peripherals.FLASH);
    let storage = AppPersistentStorage::new(flash);
    let patterns = FlashPatternStore::new(flash);
    spawner
        .spawn(persistence_task(storage, get_persistence_receiver()))
        .ok();

    // Restore the knitting state before any input or request can reach it
    let controller = KnitController::restore(
        SettingsPersistenceService::new(storage),
        patterns,
        ControllerOptions {
            persist_pulse_count: PERSIST_PULSE_COUNT,
        },
    );
    init_controllers(controller);

    let output = init_outputs(
        peripherals.RMT,
        knitled::led_gpio!(peripherals),
        peripherals.I2C0,
        knitled::display_sda_gpio!(peripherals),
        knitled::display_scl_gpio!(peripherals),
    );
    let inputs = init_inputs(
        knitled::previous_button_gpio!(peripherals),
        knitled::next_button_gpio!(peripherals),
        knitled::confirm_button_gpio!(peripherals),
        knitled::carriage_sensor_gpio!(peripherals),
        knitled::touch_gpio!(peripherals),
        peripherals.TOUCH,
    )
    .await;
    spawner.spawn(control_loop_task(inputs, output)).ok();

    match start_network(spawner, peripherals.WIFI, storage.load_wifi()).await {
        NetworkMode::Station { stack } => {
            spawner.spawn(knit_http_task(stack)).ok();
            loop {
                Timer::after(Duration::from_secs(5)).await;
            }
        }
        NetworkMode::AccessPoint { stack, ssid: _ssid } => {
            #[cfg(feature = "log")]
            println!("main: waiting for credentials on {}", _ssid);
            spawner.spawn(provisioning_http_task(stack)).ok();
            run_provisioning(storage).await
        }
    }
}

/// Store submitted credentials and restart into station mode.
async fn run_provisioning(storage: AppPersistentStorage) -> ! {
    loop {
        let ProvisioningEvent::CredentialsSaved(credentials) = next_provisioning_event().await;
        match storage.save_wifi(&credentials) {
            Ok(()) => {
                #[cfg(feature = "log")]
                println!("main: credentials for {} saved, restarting", credentials.ssid);
                Timer::after(RESTART_DELAY).await;
                esp_hal::system::software_reset();
            }
            Err(_e) => {
                #[cfg(feature = "log")]
                println!("main: failed to save credentials: {}", _e.as_str());
            }
        }
    }
}
