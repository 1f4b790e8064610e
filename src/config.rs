#![allow(clippy::unreadable_literal)]

use core::fmt::Write as _;

use embassy_net::Ipv4Address;
use embassy_time::Duration;
use heapless::String;

pub const BUILD_VERSION: &str = env!("BUILD_VERSION");

pub struct DeviceConfig {
    pub name: &'static str,
    pub hostname: &'static str,
    pub ap_ssid_prefix: &'static str,
}

pub struct NetworkConfig {
    pub connect_timeout: Duration,
    pub connect_poll: Duration,
    pub reconnect_delay: Duration,
    pub ap_address: Ipv4Address,
    pub ap_prefix_len: u8,
}

pub struct StorageConfig {
    /// Base address of the `knit_state` partition (defined in partitions.csv).
    pub settings_offset: u32,
    /// Base address of the `patterns` partition, one sector per pattern.
    pub patterns_offset: u32,
    pub write_debounce: Duration,
}

pub struct ControlConfig {
    pub loop_period: Duration,
    pub debounce: Duration,
    pub blink_period: Duration,
    /// How long the IP address stays on screen after joining a network.
    pub status_hold: Duration,
    /// A touch reading below this share of the idle baseline counts as a touch.
    pub touch_threshold_percent: u8,
}

pub const DEVICE: DeviceConfig = DeviceConfig {
    name: "KnittLED",
    hostname: "knittled",
    ap_ssid_prefix: "KnittLED",
};

pub const NETWORK: NetworkConfig = NetworkConfig {
    connect_timeout: Duration::from_secs(15),
    connect_poll: Duration::from_millis(250),
    reconnect_delay: Duration::from_secs(5),
    ap_address: Ipv4Address::new(192, 168, 4, 1),
    ap_prefix_len: 24,
};

pub const STORAGE: StorageConfig = StorageConfig {
    settings_offset: 0x31_0000,
    patterns_offset: 0x32_0000,
    write_debounce: Duration::from_millis(1000),
};

pub const CONTROL: ControlConfig = ControlConfig {
    loop_period: Duration::from_millis(5),
    debounce: Duration::from_millis(60),
    blink_period: Duration::from_millis(300),
    status_hold: Duration::from_secs(3),
    touch_threshold_percent: 70,
};

/// Status pixel plus one LED per pattern column.
pub const LED_COUNT: usize = 1 + knitled_core::MAX_WIDTH as usize;

/// Restore `totalPulses` from flash at boot.
pub const PERSIST_PULSE_COUNT: bool = false;

/// Station credentials as entered on the setup page.
#[derive(Debug, Clone)]
pub struct WifiCredentials {
    pub ssid: String<32>,
    pub password: String<64>,
}

pub fn mac_address() -> String<17> {
    let mac = esp_hal::efuse::Efuse::mac_address();
    let mut out = String::new();
    let _ = write!(
        out,
        "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
        mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
    );
    out
}

/// Access point name, e.g. `KnittLED-3F2A`.
pub fn ap_ssid() -> String<32> {
    let mac = esp_hal::efuse::Efuse::mac_address();
    let mut ssid = String::new();
    let _ = write!(ssid, "{}-{:02X}{:02X}", DEVICE.ap_ssid_prefix, mac[4], mac[5]);
    ssid
}

#[macro_export]
macro_rules! led_gpio {
    ($p:expr) => {
        $p.GPIO25
    };
}

#[macro_export]
macro_rules! previous_button_gpio {
    ($p:expr) => {
        $p.GPIO32
    };
}

#[macro_export]
macro_rules! next_button_gpio {
    ($p:expr) => {
        $p.GPIO33
    };
}

#[macro_export]
macro_rules! confirm_button_gpio {
    ($p:expr) => {
        $p.GPIO27
    };
}

#[macro_export]
macro_rules! carriage_sensor_gpio {
    ($p:expr) => {
        $p.GPIO26
    };
}

/// Capacitive pad T0.
#[macro_export]
macro_rules! touch_gpio {
    ($p:expr) => {
        $p.GPIO4
    };
}

#[macro_export]
macro_rules! display_sda_gpio {
    ($p:expr) => {
        $p.GPIO21
    };
}

#[macro_export]
macro_rules! display_scl_gpio {
    ($p:expr) => {
        $p.GPIO22
    };
}

/// Concrete pin type behind [`touch_gpio!`].
pub type TouchGpio = esp_hal::peripherals::GPIO4<'static>;
