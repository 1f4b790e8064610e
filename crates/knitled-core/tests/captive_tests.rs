//! Setup access point: DNS answers, portal address, scan results.

use knitled_core::captive::{
    MAX_DNS_PACKET_SIZE,
    MAX_SCAN_RESULTS,
    answer_query,
    normalize_ssid,
    portal_url,
    visible_networks,
};

const AP: [u8; 4] = [192, 168, 4, 1];
const TYPE_A: u16 = 1;
const TYPE_AAAA: u16 = 28;

/// Standard recursive query for `name` with one question.
fn query(name: &str, qtype: u16) -> Vec<u8> {
    let mut packet = vec![0xBE, 0xEF, 0x01, 0x00, 0, 1, 0, 0, 0, 0, 0, 0];
    for label in name.split('.') {
        packet.push(u8::try_from(label.len()).unwrap());
        packet.extend_from_slice(label.as_bytes());
    }
    packet.push(0);
    packet.extend_from_slice(&qtype.to_be_bytes());
    packet.extend_from_slice(&1u16.to_be_bytes());
    packet
}

fn answer(query: &[u8]) -> Option<Vec<u8>> {
    let mut out = [0u8; MAX_DNS_PACKET_SIZE];
    answer_query(query, AP, &mut out).map(|len| out[..len].to_vec())
}

// -----------------------------------------------------------------------------
// DNS
// -----------------------------------------------------------------------------

#[test]
fn any_name_resolves_to_access_point() {
    let query = query("connectivitycheck.gstatic.com", TYPE_A);

    let reply = answer(&query).unwrap();

    assert_eq!(&reply[..2], &[0xBE, 0xEF]);
    // response, authoritative, recursion desired echoed
    assert_eq!(reply[2], 0x85);
    assert_eq!(reply[3], 0x00);
    assert_eq!(&reply[4..12], &[0, 1, 0, 1, 0, 0, 0, 0]);
    assert_eq!(&reply[12..query.len()], &query[12..]);

    let record = &reply[query.len()..];
    assert_eq!(record, &[0xC0, 0x0C, 0, 1, 0, 1, 0, 0, 0, 60, 0, 4, 192, 168, 4, 1]);
}

#[test]
fn other_record_types_get_empty_answer() {
    let query = query("captive.apple.com", TYPE_AAAA);

    let reply = answer(&query).unwrap();

    assert_eq!(reply.len(), query.len());
    assert_eq!(&reply[6..8], &[0, 0]);
    assert_eq!(reply[2] & 0x80, 0x80);
}

#[test]
fn additional_records_are_dropped() {
    let mut query = query("example.org", TYPE_A);
    let question_len = query.len();
    query[11] = 1;
    // EDNS OPT record
    query.extend_from_slice(&[0, 0, 41, 0x10, 0, 0, 0, 0, 0, 0, 0]);

    let reply = answer(&query).unwrap();

    assert_eq!(reply.len(), question_len + 16);
    assert_eq!(&reply[10..12], &[0, 0]);
    assert_eq!(&reply[reply.len() - 4..], &AP);
}

#[test]
fn responses_and_other_opcodes_are_ignored() {
    let mut response = query("example.org", TYPE_A);
    response[2] |= 0x80;
    assert_eq!(answer(&response), None);

    let mut status = query("example.org", TYPE_A);
    status[2] = 2 << 3;
    assert_eq!(answer(&status), None);
}

#[test]
fn malformed_queries_are_ignored() {
    assert_eq!(answer(&[0u8; 11]), None);

    let mut no_question = query("example.org", TYPE_A);
    no_question[5] = 0;
    assert_eq!(answer(&no_question), None);

    let full = query("example.org", TYPE_A);
    assert_eq!(answer(&full[..full.len() - 2]), None);

    let mut compressed = query("example.org", TYPE_A);
    compressed[12] = 0xC0;
    assert_eq!(answer(&compressed), None);
}

#[test]
fn reply_that_does_not_fit_is_not_built() {
    let query = query("example.org", TYPE_A);
    let mut out = [0u8; 24];

    assert_eq!(answer_query(&query, AP, &mut out), None);
}

// -----------------------------------------------------------------------------
// Portal address and credentials
// -----------------------------------------------------------------------------

#[test]
fn portal_url_follows_configured_address() {
    assert_eq!(portal_url(AP).as_str(), "http://192.168.4.1/");
    assert_eq!(portal_url([10, 0, 0, 1]).as_str(), "http://10.0.0.1/");
    assert_eq!(portal_url([255; 4]).as_str(), "http://255.255.255.255/");
}

#[test]
fn ssid_is_stored_trimmed() {
    assert_eq!(normalize_ssid("  home wifi \t").unwrap().as_str(), "home wifi");
    assert_eq!(normalize_ssid("plain").unwrap().as_str(), "plain");
}

#[test]
fn blank_ssid_is_rejected() {
    assert_eq!(normalize_ssid(""), None);
    assert_eq!(normalize_ssid("   "), None);
}

// -----------------------------------------------------------------------------
// Scan results
// -----------------------------------------------------------------------------

#[test]
fn networks_are_listed_strongest_first_without_duplicates() {
    let scan = [("cafe", -80), ("home", -60), ("", -30), ("cafe", -50), ("attic", -90)];

    let networks = visible_networks(scan);

    let names: Vec<&str> = networks.iter().map(|ssid| ssid.as_str()).collect();
    assert_eq!(names, ["cafe", "home", "attic"]);
}

#[test]
fn weakest_networks_are_dropped_when_full() {
    let names: Vec<String> = (0..=MAX_SCAN_RESULTS).map(|i| format!("net{i}")).collect();
    let scan = names
        .iter()
        .zip(0i8..)
        .map(|(name, i)| (name.as_str(), -90 + i));

    let networks = visible_networks(scan);

    assert_eq!(networks.len(), MAX_SCAN_RESULTS);
    assert_eq!(networks[0].as_str(), format!("net{MAX_SCAN_RESULTS}"));
    assert!(networks.iter().all(|ssid| ssid.as_str() != "net0"));
}
