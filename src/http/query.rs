//! Query string parsing
//!
//! Parameters are stored in a map: when a key repeats, the last value wins.
//! Values are kept exactly as sent (no percent-decoding).

use std::collections::HashMap;

/// Parse a raw query string (without the leading `?`)
///
/// Each `&`-separated token is split once on the first `=`. A token without
/// `=` becomes a key with an empty value.
///
/// # Examples
/// ```
/// use quittable_httpd::http::query::parse_query;
///
/// let params = parse_query("quit=1&debug&quit=0");
/// assert_eq!(params.get("quit").map(String::as_str), Some("0"));
/// assert_eq!(params.get("debug").map(String::as_str), Some(""));
/// ```
pub fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|token| !token.is_empty())
        .map(|token| match token.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (token.to_string(), String::new()),
        })
        .collect()
}
