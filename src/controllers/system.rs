use heapless::String;

use crate::{
    config,
    core::net::http::{HttpConnection, HttpResult},
    domain::dto::SystemInformation,
};

pub(super) async fn handle_get_system_information(conn: &mut HttpConnection<'_>) -> HttpResult {
    let mut build_version = String::<32>::new();
    // the version is truncated rather than rejected
    for ch in config::BUILD_VERSION.chars() {
        if build_version.push(ch).is_err() {
            break;
        }
    }

    let system_information = SystemInformation {
        build_version,
        mac_address: config::mac_address(),
    };
    conn.write_json(&system_information).await
}
