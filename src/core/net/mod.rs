pub(crate) mod dhcp;
pub(crate) mod http;
