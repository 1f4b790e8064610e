//! Network lifecycle events
//!
//! Network tasks publish status here; the control loop turns it into the
//! status pixel and a display screen. Submitted credentials travel on a
//! separate queue to the main task.

use core::cell::RefCell;

use embassy_sync::{
    blocking_mutex::{Mutex, raw::CriticalSectionRawMutex},
    channel::Channel,
    signal::Signal,
};
use heapless::{String, Vec};
use knitled_core::captive::{MAX_SCAN_RESULTS, Ssid};

use crate::config::WifiCredentials;

#[derive(Debug, Clone)]
pub(crate) enum NetworkStatus {
    Connecting(String<32>),
    Online([u8; 4]),
    Provisioning(String<32>),
    Offline,
}

static NETWORK_STATUS: Signal<CriticalSectionRawMutex, NetworkStatus> = Signal::new();

/// Replace the pending status. Only the latest one is shown.
pub(crate) fn publish_network_status(status: NetworkStatus) {
    NETWORK_STATUS.signal(status);
}

pub(crate) fn take_network_status() -> Option<NetworkStatus> {
    NETWORK_STATUS.try_take()
}

#[derive(Debug, Clone)]
pub enum ProvisioningEvent {
    CredentialsSaved(WifiCredentials),
}

static PROVISIONING_EVENTS: Channel<CriticalSectionRawMutex, ProvisioningEvent, 2> = Channel::new();

/// Queue an event for the main task. Fails when the queue is full.
pub(crate) fn push_provisioning_event(event: ProvisioningEvent) -> Result<(), ProvisioningEvent> {
    PROVISIONING_EVENTS
        .try_send(event)
        .map_err(|err| match err {
            embassy_sync::channel::TrySendError::Full(event) => event,
        })
}

pub async fn next_provisioning_event() -> ProvisioningEvent {
    PROVISIONING_EVENTS.receive().await
}

type NetworkList = Vec<Ssid, MAX_SCAN_RESULTS>;

/// Networks seen by the last scan before the access point came up.
static VISIBLE_NETWORKS: Mutex<CriticalSectionRawMutex, RefCell<NetworkList>> =
    Mutex::new(RefCell::new(Vec::new()));

pub(crate) fn store_visible_networks(networks: NetworkList) {
    VISIBLE_NETWORKS.lock(|cell| *cell.borrow_mut() = networks);
}

pub(crate) fn visible_networks() -> NetworkList {
    VISIBLE_NETWORKS.lock(|cell| cell.borrow().clone())
}
