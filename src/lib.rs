//! # repl-bridge
//!
//! Worker-side bridge that hosts a foreign, pre-built language interpreter
//! and exposes it to a host through an asynchronous message protocol, so the
//! host can run an interactive read-eval-print session without blocking.
//!
//! ## Features
//!
//! - **Strict message protocol**: tagged `input` / `debug` / `stdout` /
//!   `stderr` / `status` frames, delivered in production order
//! - **Observable lifecycle**: `Unloaded → Loading → Booting → Ready ⇄
//!   Evaluating` state machine with `Terminated` for fatal faults
//! - **Lazy virtual filesystem**: manifest-declared files fetched on first
//!   open and cached for the session lifetime
//! - **Opaque interpreter seam**: the payload is driven through the
//!   [`Interpreter`] capability trait; the bridge never implements it
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use repl_bridge::{Config, Gateway, HttpFetcher, InboundMessage, OutboundSender};
//! use tokio::sync::mpsc;
//!
//! # fn interpreter_factory() -> Arc<dyn repl_bridge::InterpreterFactory> { unimplemented!() }
//! #[tokio::main]
//! async fn main() -> repl_bridge::Result<()> {
//!     repl_bridge::logging::try_init().ok();
//!
//!     let mut config = Config::default();
//!     config.payload.url = "http://host/interpreter.bin".to_string();
//!
//!     let (outbound, mut host_rx) = OutboundSender::channel();
//!     let (host_tx, inbound) = mpsc::unbounded_channel::<InboundMessage>();
//!
//!     let gateway = Gateway::new(
//!         &config,
//!         Arc::new(HttpFetcher::new()),
//!         interpreter_factory(),
//!         outbound,
//!     )?;
//!     tokio::spawn(gateway.run(inbound));
//!
//!     host_tx
//!         .send(InboundMessage::Input {
//!             data: "print('welcome')".to_string(),
//!             silent: false,
//!         })
//!         .ok();
//!     while let Some(frame) = host_rx.recv().await {
//!         println!("{}", serde_json::to_string(&frame).unwrap());
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod fetch;
pub mod interpreter;
pub mod loader;
pub mod logging;
pub mod protocol;
pub mod session;
pub mod streams;
pub mod vfs;

// Re-export commonly used types
pub use config::Config;
pub use error::{BridgeError, Result};
pub use fetch::{Fetcher, HttpFetcher};
pub use interpreter::{EvalFault, Interpreter, InterpreterFactory, WorkerEnv};
pub use loader::InterpreterLoader;
pub use protocol::{Gateway, InboundMessage, OutboundMessage, Status};
pub use session::{Command, EvalOutcome, Session, SessionState};
pub use streams::{OutboundSender, StreamRedirector};
pub use vfs::LazyFs;
