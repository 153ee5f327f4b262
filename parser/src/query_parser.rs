use std::collections::HashMap;

/// Decodes the query component of a request target into a key/value map.
///
/// Everything after the FIRST `?` is the query string; a second `?` is
/// content, not a new query start. Tokens split on `&`, each token splits
/// at its first `=` (no `=` means an empty value), and both halves are
/// percent-decoded. Repeated keys keep the last value.
pub fn parse_query(target: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();

    let query = match target.split_once('?') {
        Some((_, query)) => query,
        None => return params,
    };
    if query.is_empty() {
        return params;
    }

    for token in query.split('&') {
        let (mut key, mut value) = (token, "");
        if let Some((k, v)) = token.split_once('=') {
            (key, value) = (k, v);
        }
        params.insert(percent_decode(key), percent_decode(value));
    }

    return params;
}

/// Resolves `%XY` escapes to their byte values. `+` is left alone (no
/// form-encoding normalization), and a truncated or non-hex escape passes
/// through verbatim so that decoding is total and deterministic. Decoded
/// bytes are read as UTF-8, lossily.
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    return String::from_utf8_lossy(&out).into_owned();
}

#[inline]
fn hex_value(b: u8) -> Option<u8> {
    return match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    };
}
