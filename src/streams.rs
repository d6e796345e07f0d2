//! Standard-stream redirection into the outbound message channel.

use tokio::sync::mpsc;
use tracing::trace;

use crate::protocol::{OutboundMessage, Status};

/// Sending half of the outbound protocol channel.
///
/// The channel is unbounded so that sends from synchronous interpreter code
/// never block or reorder; a closed channel (host gone) drops the frame.
#[derive(Debug, Clone)]
pub struct OutboundSender {
    tx: mpsc::UnboundedSender<OutboundMessage>,
}

impl OutboundSender {
    /// Wrap an unbounded channel sender.
    pub fn new(tx: mpsc::UnboundedSender<OutboundMessage>) -> Self {
        Self { tx }
    }

    /// Create a sender together with its receiving half.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<OutboundMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Send a frame, dropping it if the host side has hung up.
    pub fn send(&self, msg: OutboundMessage) {
        if self.tx.send(msg).is_err() {
            trace!("outbound channel closed, frame dropped");
        }
    }

    /// Send a `debug` frame.
    pub fn debug(&self, text: impl Into<String>) {
        self.send(OutboundMessage::debug(text));
    }

    /// Send a `stdout` frame.
    pub fn stdout(&self, chunk: impl Into<String>) {
        self.send(OutboundMessage::stdout(chunk));
    }

    /// Send a `stderr` frame.
    pub fn stderr(&self, chunk: impl Into<String>) {
        self.send(OutboundMessage::stderr(chunk));
    }

    /// Send a `status` frame.
    pub fn status(&self, status: Status) {
        self.send(OutboundMessage::Status(status));
    }
}

/// Replacement for the interpreter's standard streams.
///
/// Installed before the payload runs and shared (behind one `Arc`) for the
/// whole session, so the interpreter sees a stable set of hooks. Each
/// `stdout`/`stderr` call becomes exactly one outbound frame; no buffering
/// happens here beyond what the interpreter itself performs.
#[derive(Debug, Clone)]
pub struct StreamRedirector {
    outbound: OutboundSender,
}

impl StreamRedirector {
    /// Create a redirector that relays chunks through `outbound`.
    pub fn new(outbound: OutboundSender) -> Self {
        Self { outbound }
    }

    /// Read from standard input.
    ///
    /// This environment has no live stdin outside the command protocol, so a
    /// direct read always reports end-of-input. Interpreters must treat this
    /// as EOF, not as an error.
    pub fn stdin(&self) -> Option<String> {
        None
    }

    /// Relay a chunk of standard output.
    pub fn stdout(&self, chunk: &str) {
        self.outbound.stdout(chunk);
    }

    /// Relay a chunk of standard error.
    pub fn stderr(&self, chunk: &str) {
        self.outbound.stderr(chunk);
    }
}
