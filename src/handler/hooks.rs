//! Request/response hooks
//!
//! The quit trigger that runs before GET dispatch, and the header post-hook
//! that runs on every response before it is handed back to hyper.

use std::collections::HashMap;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, SERVER};
use hyper::Response;

use crate::logger;

/// Query key that triggers shutdown
pub const QUIT_KEY: &str = "quit";

/// Whether a parsed query asks the server to stop
///
/// The value only has to contain a `1`, so `quit=1`, `quit=10` and `quit=01`
/// all count.
pub fn is_quit_request(query: &HashMap<String, String>) -> bool {
    query.get(QUIT_KEY).is_some_and(|value| value.contains('1'))
}

/// Add the wildcard CORS origin
pub fn apply_cors(response: &mut Response<Full<Bytes>>) {
    response
        .headers_mut()
        .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
}

/// Post-hook applied to every response
pub fn finalize_headers(response: &mut Response<Full<Bytes>>, server_name: &str) {
    apply_cors(response);

    if server_name.is_empty() {
        return;
    }
    match HeaderValue::from_str(server_name) {
        Ok(value) => {
            response.headers_mut().insert(SERVER, value);
        }
        Err(e) => logger::log_warning(&format!("Invalid server_name '{server_name}': {e}")),
    }
}
