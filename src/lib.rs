//! Local static file server with single byte-range support, wildcard CORS
//! and a remote quit trigger (`GET /?quit=1`).

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
