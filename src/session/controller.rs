//! Session lifecycle ownership and command serialization.

use std::sync::Arc;

use tracing::{debug, error, info};

use super::command::Command;
use super::escape::escape_source;
use super::state::SessionState;
use crate::error::BridgeError;
use crate::interpreter::{Interpreter, WorkerEnv};
use crate::protocol::Status;
use crate::streams::OutboundSender;
use crate::Result;

/// Name the bootstrap statements bind the interactive console to.
const CONSOLE_VAR: &str = "c";

/// Build the console-push statement for one unit of source text.
///
/// The raw text goes through [`escape_source`] so console metacharacters in
/// the input cannot break out of the invocation syntax.
pub(crate) fn push_statement(source_text: &str) -> String {
    format!("{}.push('{}')", CONSOLE_VAR, escape_source(source_text))
}

/// Result of one evaluated command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalOutcome {
    /// The console accepted and ran the statement.
    Completed,
    /// The runtime reported a fault; its report was relayed as `stderr`.
    Faulted(String),
}

impl EvalOutcome {
    /// Convert a fault into the matching error, for embedders that want
    /// `?`-style handling instead of inspecting the outcome.
    pub fn into_result(self) -> Result<()> {
        match self {
            EvalOutcome::Completed => Ok(()),
            EvalOutcome::Faulted(message) => Err(BridgeError::EvaluationFault(message)),
        }
    }
}

/// The worker's single interpreter session.
///
/// Owns the lifecycle state, the live interpreter capability set, and the
/// interactive console constructed during boot. Exactly one command is ever
/// in flight; the `Evaluating` state is the gate.
pub struct Session {
    state: SessionState,
    env: Arc<WorkerEnv>,
    outbound: OutboundSender,
    bootstrap: Vec<String>,
    interpreter: Option<Box<dyn Interpreter>>,
}

impl Session {
    /// Create an idle, unloaded session.
    pub fn new(env: Arc<WorkerEnv>, outbound: OutboundSender, bootstrap: Vec<String>) -> Self {
        Self {
            state: SessionState::Unloaded,
            env,
            outbound,
            bootstrap,
            interpreter: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The environment shared with the interpreter.
    pub fn env(&self) -> &Arc<WorkerEnv> {
        &self.env
    }

    /// Enter `Loading`, rejecting duplicate load triggers.
    pub(crate) fn begin_load(&mut self) -> Result<()> {
        match self.state {
            SessionState::Unloaded => self.state.transition_to(SessionState::Loading),
            SessionState::Loading => Err(BridgeError::AlreadyLoading),
            SessionState::Booting | SessionState::Ready | SessionState::Evaluating => {
                Err(BridgeError::AlreadyLoaded)
            }
            SessionState::Terminated => Err(BridgeError::SessionTerminated),
        }
    }

    /// Enter `Booting` after a successful payload fetch.
    pub(crate) fn begin_boot(&mut self) -> Result<()> {
        self.state.transition_to(SessionState::Booting)
    }

    /// Finish booting: run the entry point and bootstrap statements, then
    /// announce readiness.
    ///
    /// Any fault here is fatal; the session moves to `Terminated` and the
    /// failure is reported on the `debug` channel.
    pub(crate) fn complete_boot(
        &mut self,
        mut interpreter: Box<dyn Interpreter>,
        entry_args: &[String],
    ) -> Result<()> {
        debug_assert_eq!(self.state, SessionState::Booting);

        if let Err(fault) = interpreter.start(entry_args) {
            self.terminate(&format!("interpreter startup failed: {fault}"));
            return Err(BridgeError::LoadFailure(fault.message));
        }

        // The console-creation facility and startup helpers are trusted
        // configuration; they run unescaped, before readiness is announced.
        for statement in self.bootstrap.clone() {
            debug!(statement = %statement, "running bootstrap statement");
            let result = interpreter.run_source(&statement);
            interpreter.reclaim();
            if let Err(fault) = result {
                self.terminate(&format!(
                    "bootstrap statement '{statement}' failed: {fault}"
                ));
                return Err(BridgeError::LoadFailure(fault.message));
            }
        }

        self.interpreter = Some(interpreter);
        self.state.transition_to(SessionState::Ready)?;
        self.outbound.status(Status::Ready);
        info!("session ready");
        Ok(())
    }

    /// Evaluate one command to completion.
    ///
    /// Rejected with [`BridgeError::NotReady`] unless the session is idle in
    /// `Ready`; a rejected command is never dispatched to the interpreter.
    /// A runtime fault is relayed as `stderr` and the session returns to
    /// `Ready` — one failing command never terminates the session.
    pub fn submit(&mut self, command: &Command) -> Result<EvalOutcome> {
        if !self.state.can_accept() {
            return Err(BridgeError::NotReady(self.state));
        }
        let interpreter = match self.interpreter.as_mut() {
            Some(i) => i,
            None => return Err(BridgeError::NotReady(self.state)),
        };

        self.state.transition_to(SessionState::Evaluating)?;

        let statement = push_statement(&command.source_text);
        debug!(statement = %statement, "pushing command to console");
        let result = interpreter.run_source(&statement);
        interpreter.reclaim();

        let outcome = match result {
            Ok(()) => EvalOutcome::Completed,
            Err(fault) => {
                self.outbound.stderr(fault.message.clone());
                EvalOutcome::Faulted(fault.message)
            }
        };

        self.state.transition_to(SessionState::Ready)?;
        Ok(outcome)
    }

    /// Move to `Terminated` and report the reason on the `debug` channel.
    pub(crate) fn terminate(&mut self, reason: &str) {
        error!(reason, "session terminated");
        self.outbound.debug(format!("session terminated: {reason}"));
        let _ = self.state.transition_to(SessionState::Terminated);
        self.interpreter = None;
    }
}
