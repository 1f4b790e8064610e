use heapless::{String, Vec};
use knitled_core::{
    PatternId,
    PatternList,
    captive::{MAX_SCAN_RESULTS, Ssid},
    codec::PatternDocument,
};
use serde::{Deserialize, Serialize};

/// Raw, not yet normalized pattern identifier as sent by clients.
pub type RawPatternId = String<64>;

#[derive(Debug, Serialize)]
pub struct SystemInformation {
    pub build_version: String<32>,
    pub mac_address: String<17>,
}

#[derive(Debug, Deserialize)]
pub struct RowStepRequest {
    pub delta: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveRowResponse {
    pub active_row: u8,
}

#[derive(Debug, Deserialize)]
pub struct FileRequest {
    pub file: RawPatternId,
}

#[derive(Debug, Serialize)]
pub struct FileResponse {
    pub file: PatternId,
}

#[derive(Debug, Serialize)]
pub struct FileListResponse {
    pub files: PatternList,
}

#[derive(Debug, Deserialize)]
pub struct PatternRequest {
    pub file: RawPatternId,
    pub pattern: PatternDocument,
}

/// Currently selected pattern.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternResponse {
    pub file: PatternId,
    pub active_row: u8,
    pub pattern: PatternDocument,
}

#[derive(Debug, Serialize)]
pub struct NetworkScanResponse {
    pub networks: Vec<Ssid, MAX_SCAN_RESULTS>,
}

#[derive(Debug, Deserialize)]
pub struct WifiCredentialsRequest {
    pub ssid: String<32>,
    #[serde(default)]
    pub password: String<64>,
}
