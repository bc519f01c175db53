//! Listener and dispatch loop.

pub mod listener;

pub use listener::{HttpServer, ServerError, ShutdownHandle};
