//! The interpreter payload seam.
//!
//! The bridge never implements the interpreter; it treats the loaded payload
//! as an opaque capability set. An [`InterpreterFactory`] renders "execute
//! the payload" by turning fetched bytes plus the prepared [`WorkerEnv`]
//! into a live [`Interpreter`], whose designated entry point the bridge then
//! drives in a fixed order.

use std::sync::Arc;

use crate::fetch::Fetcher;
use crate::streams::{OutboundSender, StreamRedirector};
use crate::vfs::LazyFs;

/// Environment handed to the interpreter before it runs.
///
/// Exactly one instance exists per worker, shared behind an `Arc` so the
/// interpreter sees the same stream hooks and filesystem for the whole
/// session.
pub struct WorkerEnv {
    /// Redirected standard streams.
    pub streams: StreamRedirector,
    /// Lazily-fetched virtual filesystem.
    pub fs: LazyFs,
}

impl WorkerEnv {
    /// Build the environment around the outbound channel and a fetcher.
    pub fn new(outbound: OutboundSender, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            streams: StreamRedirector::new(outbound),
            fs: LazyFs::new(fetcher),
        }
    }
}

/// A runtime error reported by the interpreter for one evaluation.
///
/// Faults are ordinary session traffic: they are relayed to the host as
/// `stderr` and the session stays usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalFault {
    /// The runtime's report, typically a traceback.
    pub message: String,
}

impl EvalFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for EvalFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Capability set exposed by a loaded interpreter payload.
///
/// The bridge calls these in a fixed order: `start` exactly once after the
/// environment is installed, then `run_source` for each statement (bootstrap
/// statements first, then console pushes), with `reclaim` after every
/// `run_source` to free whatever scratch allocation the runtime retained.
pub trait Interpreter: Send {
    /// Run the payload's designated startup routine.
    ///
    /// `args` is the fixed, minimal argument set from configuration. Called
    /// exactly once; a failure here is fatal to the session.
    fn start(&mut self, args: &[String]) -> Result<(), EvalFault>;

    /// Execute one statement of source text in the runtime.
    ///
    /// Output produced by the statement flows through the environment's
    /// [`StreamRedirector`], not through the return value.
    fn run_source(&mut self, statement: &str) -> Result<(), EvalFault>;

    /// Free any scratch allocation retained from the last `run_source` call.
    fn reclaim(&mut self);
}

/// Instantiates an [`Interpreter`] from a fetched payload.
///
/// This is the point where the payload's code is executed; the factory owns
/// whatever embedding mechanism that requires (a wasm engine, a linked
/// runtime, a subprocess) and hands the bridge only the capability set.
pub trait InterpreterFactory: Send + Sync {
    /// Execute `payload` with `env` installed as its environment.
    ///
    /// Errors are fatal load failures; the returned string is included in
    /// the `debug` report to the host.
    fn instantiate(
        &self,
        payload: Vec<u8>,
        env: Arc<WorkerEnv>,
    ) -> Result<Box<dyn Interpreter>, String>;
}
