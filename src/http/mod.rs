//! HTTP protocol layer module
//!
//! Request parsing helpers (query, range, URL coding) and response builders,
//! independent of how files are located on disk.

pub mod date;
pub mod mime;
pub mod query;
pub mod range;
pub mod response;
pub mod url;

// Re-export commonly used types
pub use range::{parse_range_header, ByteRange, RangeParseResult};
pub use response::{
    build_403_response, build_404_response, build_416_response, build_500_response,
    build_501_response, build_options_response, build_quit_response, build_redirect_response,
};
