//! Session management module.
//!
//! One worker hosts exactly one session for its lifetime. This module owns
//! the lifecycle state machine, the command type, and the controller that
//! serializes command evaluation against the interpreter.

mod command;
mod controller;
mod escape;
mod state;

pub use command::Command;
pub use controller::{EvalOutcome, Session};
pub use escape::escape_source;
pub use state::SessionState;
