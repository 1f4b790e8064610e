//! Wi-Fi bring-up
//!
//! With stored credentials the radio first tries station mode for a bounded
//! time. Without credentials, or when that attempt times out, it falls back
//! to an open access point that leases addresses over DHCP and resolves
//! every DNS lookup to itself. Nearby networks are scanned once before the
//! access point starts.

use embassy_executor::Spawner;
use embassy_net::{
    DhcpConfig,
    Ipv4Cidr,
    Runner,
    Stack,
    StackResources,
    StaticConfigV4,
};
use embassy_time::{Timer, with_timeout};
use esp_hal::{peripherals::WIFI, rng::Rng};
#[cfg(feature = "log")]
use esp_println::println;
use esp_radio::wifi::{
    AccessPointConfig,
    AuthMethod,
    ClientConfig,
    Config,
    ModeConfig,
    ScanConfig,
    WifiController,
    WifiDevice,
    WifiError,
    WifiEvent,
    WifiStaState,
};
use heapless::{String, Vec};
use knitled_core::captive::{self, MAX_SCAN_RESULTS, Ssid};

use crate::{
    config::{self, DEVICE, NETWORK, WifiCredentials},
    infrastructure::{
        services::{NetworkStatus, publish_network_status, store_visible_networks},
        tasks::{dhcp_server_task, dns_server_task},
    },
    mk_static,
};

const MAX_CONNECTIONS: usize = 6;

/// Access points reported by one scan, before merging repeated names.
const SCAN_LIMIT: usize = 32;

/// How the device ended up on the network.
pub enum NetworkMode {
    Station { stack: Stack<'static> },
    AccessPoint { stack: Stack<'static>, ssid: String<32> },
}

/// Bring up Wi-Fi: station mode when `credentials` connect in time,
/// provisioning access point otherwise.
pub async fn start_network(
    spawner: Spawner,
    wifi_device: WIFI<'static>,
    credentials: Option<WifiCredentials>,
) -> NetworkMode {
    let radio = mk_static!(
        esp_radio::Controller<'static>,
        esp_radio::init().expect("radio init")
    );
    let (mut controller, interfaces) =
        esp_radio::wifi::new(radio, wifi_device, Config::default()).expect("wifi init");

    if let Some(credentials) = credentials {
        publish_network_status(NetworkStatus::Connecting(credentials.ssid.clone()));

        let mut dhcp_config = DhcpConfig::default();
        let mut hostname = String::new();
        let _ = hostname.push_str(DEVICE.hostname);
        dhcp_config.hostname = Some(hostname);
        let resources = mk_static!(
            StackResources<MAX_CONNECTIONS>,
            StackResources::<MAX_CONNECTIONS>::new()
        );
        let (stack, runner) = embassy_net::new(
            interfaces.sta,
            embassy_net::Config::dhcpv4(dhcp_config),
            resources,
            get_seed(),
        );
        spawner.spawn(network_runner_task(runner)).ok();

        let attempt = with_timeout(
            NETWORK.connect_timeout,
            connect_station(&mut controller, &credentials, stack),
        )
        .await;
        match attempt {
            Ok(Ok(ip_config)) => {
                let address = ip_config.address.address();
                #[cfg(feature = "log")]
                println!("network: connected, address {}", address);
                publish_network_status(NetworkStatus::Online(address.octets()));
                spawner
                    .spawn(wifi_connection_task(controller, stack))
                    .ok();
                return NetworkMode::Station { stack };
            }
            Ok(Err(_e)) => {
                #[cfg(feature = "log")]
                println!("network: station setup failed: {:?}", _e);
            }
            Err(_) => {
                #[cfg(feature = "log")]
                println!("network: no connection after {:?}", NETWORK.connect_timeout);
            }
        }
        let _ = controller.disconnect_async().await;
        let _ = controller.stop_async().await;
    }

    start_access_point(spawner, controller, interfaces.ap).await
}

fn client_config(credentials: &WifiCredentials) -> ClientConfig {
    let config = ClientConfig::default().with_ssid(credentials.ssid.as_str().into());
    if credentials.password.is_empty() {
        config.with_auth_method(AuthMethod::None)
    } else {
        config.with_password(credentials.password.as_str().into())
    }
}

/// Associate and wait for a DHCP lease, retrying every poll interval.
async fn connect_station(
    controller: &mut WifiController<'static>,
    credentials: &WifiCredentials,
    stack: Stack<'static>,
) -> Result<StaticConfigV4, WifiError> {
    controller.set_config(&ModeConfig::Client(client_config(credentials)))?;
    controller.start_async().await?;

    #[cfg(feature = "log")]
    println!("network: connecting to '{}'", credentials.ssid.as_str());
    while let Err(_e) = controller.connect_async().await {
        #[cfg(feature = "log")]
        println!("network: connect attempt failed: {:?}", _e);
        Timer::after(NETWORK.connect_poll).await;
    }

    Ok(wait_for_ip(stack).await)
}

async fn wait_for_ip(stack: Stack<'_>) -> StaticConfigV4 {
    loop {
        if stack.is_link_up() {
            if let Some(config) = stack.config_v4() {
                return config;
            }
        }
        Timer::after(NETWORK.connect_poll).await;
    }
}

async fn start_access_point(
    spawner: Spawner,
    controller: WifiController<'static>,
    device: WifiDevice<'static>,
) -> NetworkMode {
    let ssid = config::ap_ssid();
    publish_network_status(NetworkStatus::Provisioning(ssid.clone()));

    let static_config = StaticConfigV4 {
        address: Ipv4Cidr::new(NETWORK.ap_address, NETWORK.ap_prefix_len),
        gateway: Some(NETWORK.ap_address),
        dns_servers: heapless::Vec::default(),
    };
    let resources = mk_static!(
        StackResources<MAX_CONNECTIONS>,
        StackResources::<MAX_CONNECTIONS>::new()
    );
    let (stack, runner) = embassy_net::new(
        device,
        embassy_net::Config::ipv4_static(static_config),
        resources,
        get_seed(),
    );

    spawner.spawn(network_runner_task(runner)).ok();
    spawner
        .spawn(access_point_task(controller, ssid.clone()))
        .ok();

    while !stack.is_link_up() {
        Timer::after(NETWORK.connect_poll).await;
    }
    spawner.spawn(dhcp_server_task(stack)).ok();
    spawner.spawn(dns_server_task(stack)).ok();

    NetworkMode::AccessPoint { stack, ssid }
}

/// Keep the station connected: wait for a disconnect, then retry.
#[embassy_executor::task]
async fn wifi_connection_task(mut controller: WifiController<'static>, stack: Stack<'static>) {
    loop {
        if esp_radio::wifi::sta_state() == WifiStaState::Connected {
            controller.wait_for_event(WifiEvent::StaDisconnected).await;
            #[cfg(feature = "log")]
            println!("network: disconnected");
            publish_network_status(NetworkStatus::Offline);
            Timer::after(NETWORK.reconnect_delay).await;
        }

        match controller.connect_async().await {
            Ok(()) => {
                let ip_config = wait_for_ip(stack).await;
                publish_network_status(NetworkStatus::Online(ip_config.address.address().octets()));
            }
            Err(_e) => {
                #[cfg(feature = "log")]
                println!("network: error reconnecting: {:?}", _e);
                Timer::after(NETWORK.reconnect_delay).await;
            }
        }
    }
}

/// Configure and hold the open provisioning access point.
#[embassy_executor::task]
async fn access_point_task(mut controller: WifiController<'static>, ssid: String<32>) {
    match scan_networks(&mut controller).await {
        Ok(networks) => {
            #[cfg(feature = "log")]
            println!("network: {} networks nearby", networks.len());
            store_visible_networks(networks);
        }
        Err(_e) => {
            #[cfg(feature = "log")]
            println!("network: scan failed: {:?}", _e);
        }
    }

    #[cfg(feature = "log")]
    println!("network: starting AP '{}'", ssid.as_str());

    let ap_config = AccessPointConfig::default()
        .with_ssid(ssid.as_str().into())
        .with_auth_method(AuthMethod::None);
    if let Err(_e) = controller.set_config(&ModeConfig::AccessPoint(ap_config)) {
        #[cfg(feature = "log")]
        println!("network: AP config rejected: {:?}", _e);
        return;
    }
    if let Err(_e) = controller.start_async().await {
        #[cfg(feature = "log")]
        println!("network: AP start failed: {:?}", _e);
        return;
    }

    loop {
        controller.wait_for_event(WifiEvent::ApStop).await;
        #[cfg(feature = "log")]
        println!("network: AP stopped, restarting");
        let _ = controller.start_async().await;
    }
}

/// Scan as a station, leaving the radio stopped for reconfiguration.
async fn scan_networks(
    controller: &mut WifiController<'static>,
) -> Result<Vec<Ssid, MAX_SCAN_RESULTS>, WifiError> {
    controller.set_config(&ModeConfig::Client(ClientConfig::default()))?;
    controller.start_async().await?;
    let found = controller
        .scan_with_config_async(ScanConfig::default().with_max(SCAN_LIMIT))
        .await;
    controller.stop_async().await?;

    let found = found?;
    Ok(captive::visible_networks(
        found
            .iter()
            .map(|ap| (ap.ssid.as_str(), ap.signal_strength)),
    ))
}

/// Both the station and the access point stacks get a runner.
#[embassy_executor::task(pool_size = 2)]
async fn network_runner_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await;
}

fn get_seed() -> u64 {
    let rng = Rng::new();
    u64::from(rng.random()) << 32 | u64::from(rng.random())
}
