mod network;
mod persistence;

pub(crate) use network::{
    NetworkStatus,
    publish_network_status,
    push_provisioning_event,
    store_visible_networks,
    take_network_status,
    visible_networks,
};
pub use network::{ProvisioningEvent, next_provisioning_event};
pub use persistence::{SettingsPersistenceService, SettingsReceiver, get_persistence_receiver};
