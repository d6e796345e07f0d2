//! Host/worker message protocol.
//!
//! The host sends `{"type": "input", "data": <source>}` frames; the worker
//! answers with `debug`, `stdout`, `stderr`, and `status` frames, strictly
//! in the order they are produced.

mod gateway;
mod message;

pub use gateway::Gateway;
pub use message::{InboundMessage, OutboundMessage, Status};
