//! HTTP date formatting
//!
//! Only used for `Last-Modified`; no conditional requests are evaluated.

use chrono::{DateTime, Utc};
use std::fs::Metadata;
use std::time::SystemTime;

/// Format a timestamp as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn http_date(time: SystemTime) -> String {
    let time: DateTime<Utc> = time.into();
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// `Last-Modified` value for a file, if the platform reports an mtime
pub fn last_modified(metadata: &Metadata) -> Option<String> {
    metadata.modified().ok().map(http_date)
}
