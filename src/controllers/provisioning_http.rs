#[cfg(feature = "log")]
use esp_println::println;
use knitled_core::captive;

use super::system::handle_get_system_information;
use crate::{
    config::{NETWORK, WifiCredentials},
    core::net::http::{
        ContentHeaders,
        ContentType,
        HttpConnection,
        HttpHandler,
        HttpMethod,
        HttpResult,
        ResponseHeaders,
        TextEncoding,
    },
    domain::dto::{NetworkScanResponse, WifiCredentialsRequest},
    infrastructure::services::{ProvisioningEvent, push_provisioning_event, visible_networks},
};

const SETUP_HTML: &[u8] = include_bytes!("../assets/setup.html");

/// Wi-Fi setup served from the access point.
#[derive(Debug, Default)]
pub struct ProvisioningHttpController;

impl HttpHandler for ProvisioningHttpController {
    async fn handle_request(&self, conn: HttpConnection<'_>) -> HttpResult {
        let mut conn = conn;
        match conn.route() {
            (HttpMethod::Get, "/") => handle_get_setup_page(&mut conn).await,
            (HttpMethod::Get, "/api/system") => handle_get_system_information(&mut conn).await,
            (HttpMethod::Get, "/api/scan") => handle_get_networks(&mut conn).await,
            (HttpMethod::Post, "/api/wifi") => handle_set_wifi(&mut conn).await,
            _ => redirect_to_portal(&mut conn).await,
        }
    }
}

async fn handle_get_setup_page(conn: &mut HttpConnection<'_>) -> HttpResult {
    let content = ContentHeaders::new(ContentType::TextHtml)
        .with_text_encoding(TextEncoding::Utf8)
        .with_length(SETUP_HTML.len());
    let headers = ResponseHeaders::success().with_content(content);
    conn.write_headers(&headers).await?;
    conn.write_body(SETUP_HTML).await
}

async fn handle_get_networks(conn: &mut HttpConnection<'_>) -> HttpResult {
    let response = NetworkScanResponse {
        networks: visible_networks(),
    };
    conn.write_json(&response).await
}

/// Queue the credentials for the main task, which stores them and restarts.
async fn handle_set_wifi(conn: &mut HttpConnection<'_>) -> HttpResult {
    let request = match conn.read_json::<WifiCredentialsRequest>().await {
        Ok(request) => request,
        Err(err) => return conn.reject_request(err).await,
    };
    let Some(ssid) = captive::normalize_ssid(&request.ssid) else {
        return conn
            .write_error(ResponseHeaders::bad_request(), "ssid is required")
            .await;
    };

    #[cfg(feature = "log")]
    println!("provisioning_http: credentials received for {}", ssid);
    let credentials = WifiCredentials {
        ssid,
        password: request.password,
    };
    if push_provisioning_event(ProvisioningEvent::CredentialsSaved(credentials)).is_err() {
        return conn
            .write_error(ResponseHeaders::unavailable(), "setup already in progress")
            .await;
    }
    conn.write_headers(&ResponseHeaders::accepted()).await
}

/// Send connectivity checks and unknown paths to the setup page.
async fn redirect_to_portal(conn: &mut HttpConnection<'_>) -> HttpResult {
    let url = captive::portal_url(NETWORK.ap_address.octets());
    conn.write_headers(&ResponseHeaders::redirect(&url)).await
}
