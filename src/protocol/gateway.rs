//! The message-protocol gateway: the worker's single entry and exit point.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use super::message::{InboundMessage, Status};
use crate::config::Config;
use crate::error::BridgeError;
use crate::fetch::Fetcher;
use crate::interpreter::{InterpreterFactory, WorkerEnv};
use crate::loader::InterpreterLoader;
use crate::session::{Command, EvalOutcome, Session};
use crate::streams::OutboundSender;
use crate::Result;

/// Translates inbound messages into session calls and session events into
/// outbound frames.
///
/// All outbound traffic of the worker flows through the one
/// [`OutboundSender`] this gateway shares with the stream redirector, so
/// emission order is exactly production order.
pub struct Gateway {
    session: Session,
    loader: InterpreterLoader,
    outbound: OutboundSender,
}

impl Gateway {
    /// Assemble the worker from its configuration.
    ///
    /// Installs the stream redirector and the lazy filesystem (registering
    /// the configured manifest) before any payload code can run.
    pub fn new(
        config: &Config,
        fetcher: Arc<dyn Fetcher>,
        factory: Arc<dyn InterpreterFactory>,
        outbound: OutboundSender,
    ) -> Result<Self> {
        let env = Arc::new(WorkerEnv::new(outbound.clone(), Arc::clone(&fetcher)));
        env.fs.register(config.files.clone())?;

        let session = Session::new(
            Arc::clone(&env),
            outbound.clone(),
            config.bootstrap.statements.clone(),
        );
        let loader = InterpreterLoader::new(
            fetcher,
            factory,
            outbound.clone(),
            config.payload.url.clone(),
            config.payload.entry_args.clone(),
        );

        Ok(Self {
            session,
            loader,
            outbound,
        })
    }

    /// The session owned by this worker.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The load trigger. Valid exactly once; see [`InterpreterLoader::load`].
    pub async fn load(&mut self) -> Result<()> {
        self.loader.load(&mut self.session).await
    }

    /// Dispatch one inbound message.
    pub fn dispatch(&mut self, msg: InboundMessage) -> Result<EvalOutcome> {
        match msg {
            InboundMessage::Input { data, silent } => self.handle_input(data, silent),
        }
    }

    /// Evaluate one `input` message to completion.
    ///
    /// While `Ready`: emits `status: working` (unless the command is
    /// silent), forwards the command, and emits `status: ready` once the
    /// console returns. Outside `Ready` the command is rejected with
    /// [`BridgeError::NotReady`] before anything is emitted or dispatched.
    pub fn handle_input(&mut self, data: String, silent: bool) -> Result<EvalOutcome> {
        if !self.session.state().can_accept() {
            return Err(BridgeError::NotReady(self.session.state()));
        }

        let command = Command::new(data).silent(silent);
        if !command.silent {
            self.outbound.status(Status::Working);
        }

        let outcome = self.session.submit(&command)?;
        self.outbound.status(Status::Ready);
        Ok(outcome)
    }

    /// Run the worker: trigger the load, then serve inbound messages until
    /// the host closes the channel.
    ///
    /// Rejected inputs are reported on the `debug` channel; the host has no
    /// separate error channel to observe them on. After a failed load the
    /// loop keeps draining so late inputs are rejected, not lost in a
    /// closed-channel error on the host side.
    pub async fn run(mut self, mut inbound: mpsc::UnboundedReceiver<InboundMessage>) {
        if let Err(e) = self.load().await {
            warn!(error = %e, "payload load failed, serving rejections only");
        }

        while let Some(msg) = inbound.recv().await {
            if let Err(e) = self.dispatch(msg) {
                warn!(error = %e, "inbound message rejected");
                self.outbound.debug(format!("input rejected: {e}"));
            }
        }
        info!("inbound channel closed, worker finished");
    }
}
