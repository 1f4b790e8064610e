mod control;
mod dhcp_server;
mod dns_server;
mod http_server;
mod persistence;

pub use control::control_loop_task;
pub(crate) use dhcp_server::dhcp_server_task;
pub(crate) use dns_server::dns_server_task;
pub use http_server::{knit_http_task, provisioning_http_task};
pub use persistence::persistence_task;
