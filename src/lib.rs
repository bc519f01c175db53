//! Hearth - a small HTTP/1.1 origin server.
//!
//! Accepts TCP connections, parses requests, dispatches them through a
//! read-only route table, and serves static files from a configured web
//! root with selectable file I/O strategies.

pub mod config;
pub mod files;
pub mod http;
pub mod router;
pub mod server;
