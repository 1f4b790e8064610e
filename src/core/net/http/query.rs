//! Request target helpers: path/query split and `application/x-www-form-urlencoded`
//! value decoding.

use heapless::String;

/// Split a request target into path and query (without the `?`).
pub(crate) fn split_target(target: &str) -> (&str, &str) {
    match target.split_once('?') {
        Some((path, query)) => (path, query),
        None => (target, ""),
    }
}

/// Find `key` in a query string and return its decoded value.
///
/// Returns [`None`] when the key is absent, the value is not valid
/// percent-encoding, or it does not fit `N` bytes.
pub(crate) fn query_param<const N: usize>(query: &str, key: &str) -> Option<String<N>> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(name, _)| *name == key)
        .and_then(|(_, value)| percent_decode(value))
}

fn percent_decode<const N: usize>(raw: &str) -> Option<String<N>> {
    let mut bytes = heapless::Vec::<u8, N>::new();
    let mut input = raw.bytes();
    while let Some(byte) = input.next() {
        let decoded = match byte {
            b'+' => b' ',
            b'%' => {
                let high = hex_value(input.next()?)?;
                let low = hex_value(input.next()?)?;
                (high << 4) | low
            }
            other => other,
        };
        bytes.push(decoded).ok()?;
    }
    String::from_utf8(bytes).ok()
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}
