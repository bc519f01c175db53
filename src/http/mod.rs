//! HTTP/1.1 protocol implementation.
//!
//! One request per connection: each accepted socket is read, parsed,
//! routed, answered, and closed. There is no keep-alive, pipelining, or
//! chunked transfer-encoding.
//!
//! Submodules:
//!
//! - **`headers`**: case-insensitive header table shared by both message types
//! - **`request`** / **`response`**: immutable message value types
//! - **`parser`**: incremental request parsing from a byte buffer
//! - **`writer`**: wire serialization of responses in a fixed header order
//! - **`connection`**: the per-connection worker pipeline
//! - **`mime`**: content-type detection by extension

pub mod connection;
pub mod headers;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
