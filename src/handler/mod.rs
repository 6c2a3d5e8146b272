//! Request handler module
//!
//! Method dispatch, the quit hook, static file serving and directory listings.

pub mod hooks;
pub mod listing;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
