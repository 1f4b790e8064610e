//! Setup access point helpers
//!
//! While the device runs its open setup network every DNS lookup resolves to
//! the device itself, so phones and laptops detect a captive portal and open
//! the setup page on their own. The answer builder is stateless: one query
//! in, one reply out.

use core::fmt::Write as _;

use heapless::{String, Vec};

pub const DNS_PORT: u16 = 53;

/// Largest DNS message carried over plain UDP.
pub const MAX_DNS_PACKET_SIZE: usize = 512;

/// Networks kept from one scan.
pub const MAX_SCAN_RESULTS: usize = 16;

pub type Ssid = String<32>;

const HEADER_LEN: usize = 12;
const FLAG_QR: u8 = 0x80;
const FLAG_AA: u8 = 0x04;
const FLAG_RD: u8 = 0x01;
const OPCODE_MASK: u8 = 0x78;
const LABEL_POINTER: u8 = 0xC0;
/// Compressed name pointing at the question right after the header.
const QUESTION_NAME: [u8; 2] = [LABEL_POINTER, 0x0C];

const TYPE_A: u16 = 1;
const TYPE_ANY: u16 = 255;
const CLASS_IN: u16 = 1;
const ANSWER_TTL_SECS: u32 = 60;
const ANSWER_LEN: usize = 16;

/// Build the reply to a DNS `query` into `out`, pointing A lookups at
/// `address`. Returns the reply length.
///
/// Only the first question is answered; any further questions and extra
/// records are dropped. Lookups of other types get an empty answer.
/// Responses, non-standard opcodes and malformed packets yield `None`.
pub fn answer_query(query: &[u8], address: [u8; 4], out: &mut [u8]) -> Option<usize> {
    let header = query.get(..HEADER_LEN)?;
    if header[2] & (FLAG_QR | OPCODE_MASK) != 0 {
        return None;
    }
    if u16::from_be_bytes([header[4], header[5]]) == 0 {
        return None;
    }

    let question_end = question_end(query)?;
    let qtype = u16::from_be_bytes([query[question_end - 4], query[question_end - 3]]);
    let qclass = u16::from_be_bytes([query[question_end - 2], query[question_end - 1]]);
    let answers = matches!(qtype, TYPE_A | TYPE_ANY) && qclass == CLASS_IN;

    let len = question_end + if answers { ANSWER_LEN } else { 0 };
    let reply = out.get_mut(..len)?;
    reply[..question_end].copy_from_slice(&query[..question_end]);
    reply[2] = FLAG_QR | FLAG_AA | (header[2] & FLAG_RD);
    reply[3] = 0;
    reply[4..6].copy_from_slice(&1u16.to_be_bytes());
    reply[6..8].copy_from_slice(&u16::from(answers).to_be_bytes());
    reply[8..12].fill(0);

    if answers {
        let answer = &mut reply[question_end..];
        answer[0..2].copy_from_slice(&QUESTION_NAME);
        answer[2..4].copy_from_slice(&TYPE_A.to_be_bytes());
        answer[4..6].copy_from_slice(&CLASS_IN.to_be_bytes());
        answer[6..10].copy_from_slice(&ANSWER_TTL_SECS.to_be_bytes());
        answer[10..12].copy_from_slice(&4u16.to_be_bytes());
        answer[12..16].copy_from_slice(&address);
    }
    Some(len)
}

/// Offset just past the first question (name, type and class).
fn question_end(query: &[u8]) -> Option<usize> {
    let mut pos = HEADER_LEN;
    loop {
        let label = *query.get(pos)?;
        pos += 1;
        if label == 0 {
            break;
        }
        // queries never carry compressed names
        if label & LABEL_POINTER != 0 {
            return None;
        }
        pos += usize::from(label);
    }
    let end = pos + 4;
    (end <= query.len()).then_some(end)
}

/// Address of the setup page, e.g. `http://192.168.4.1/`.
pub fn portal_url(address: [u8; 4]) -> String<24> {
    let [a, b, c, d] = address;
    let mut url = String::new();
    // the longest dotted quad still fits
    let _ = write!(url, "http://{a}.{b}.{c}.{d}/");
    url
}

/// Network name as entered on the setup page, without surrounding
/// whitespace. `None` when nothing remains.
pub fn normalize_ssid(raw: &str) -> Option<Ssid> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut ssid = Ssid::new();
    ssid.push_str(trimmed).ok()?;
    Some(ssid)
}

/// Names from a scan as `(ssid, signal strength)` pairs, strongest first.
///
/// Hidden networks are skipped and a name seen on several access points is
/// listed once. When more than [`MAX_SCAN_RESULTS`] names are visible the
/// weakest ones are dropped.
pub fn visible_networks<'a>(
    scan: impl IntoIterator<Item = (&'a str, i8)>,
) -> Vec<Ssid, MAX_SCAN_RESULTS> {
    let mut found: Vec<(Ssid, i8), MAX_SCAN_RESULTS> = Vec::new();
    for (name, rssi) in scan {
        if name.is_empty() {
            continue;
        }
        if let Some(entry) = found.iter_mut().find(|(ssid, _)| ssid.as_str() == name) {
            entry.1 = entry.1.max(rssi);
            continue;
        }
        let mut ssid = Ssid::new();
        if ssid.push_str(name).is_err() {
            continue;
        }
        if let Err(entry) = found.push((ssid, rssi)) {
            if let Some(weakest) = found.iter_mut().min_by_key(|(_, strength)| *strength) {
                if weakest.1 < entry.1 {
                    *weakest = entry;
                }
            }
        }
    }

    found.sort_unstable_by(|a, b| b.1.cmp(&a.1));
    found.into_iter().map(|(ssid, _)| ssid).collect()
}
