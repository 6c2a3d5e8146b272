//! URL helpers
//!
//! Percent-decoding of request paths, percent-encoding of listing links and HTML escaping.

/// Decode `%XX` escapes in a URL path
///
/// Invalid escapes are kept verbatim. `+` is left alone because it only means
/// a space inside query strings, never inside paths.
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                decoded.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&decoded).into_owned()
}

/// Percent-encode a path segment for use inside an `href`
///
/// Unreserved characters and `/` pass through unchanged.
pub fn percent_encode_path(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len());
    for byte in input.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~' | b'/') {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}

/// Escape text for safe inclusion in HTML content and attribute values
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("/a%20b/c.txt"), "/a b/c.txt");
        assert_eq!(percent_decode("/%2e%2E/x"), "/../x");
        assert_eq!(percent_decode("/caf%C3%A9"), "/café");
        assert_eq!(percent_decode("/a+b"), "/a+b");
    }

    #[test]
    fn test_percent_decode_invalid_escapes() {
        assert_eq!(percent_decode("/100%"), "/100%");
        assert_eq!(percent_decode("/%zz"), "/%zz");
        assert_eq!(percent_decode("/%4"), "/%4");
    }

    #[test]
    fn test_percent_encode_path() {
        assert_eq!(percent_encode_path("my file.txt"), "my%20file.txt");
        assert_eq!(percent_encode_path("dir/"), "dir/");
        assert_eq!(percent_encode_path("a&b#c"), "a%26b%23c");
        assert_eq!(percent_encode_path("café"), "caf%C3%A9");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"x\" & 'y'</b>"),
            "&lt;b&gt;&quot;x&quot; &amp; &#x27;y&#x27;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }
}
