//! Interpreter payload loading.
//!
//! Runs the fixed preparation order exactly once: the stream redirector and
//! lazy filesystem are already installed in the session's [`WorkerEnv`]; the
//! loader finalizes the mount table, fetches the payload as a single awaited
//! asynchronous step, executes it through the factory, and hands the live
//! capability set to the session for boot.

use std::sync::Arc;

use tracing::info;

use crate::error::BridgeError;
use crate::fetch::Fetcher;
use crate::interpreter::InterpreterFactory;
use crate::protocol::Status;
use crate::session::Session;
use crate::streams::OutboundSender;
use crate::Result;

/// Fetches the interpreter payload and drives session boot.
pub struct InterpreterLoader {
    fetcher: Arc<dyn Fetcher>,
    factory: Arc<dyn InterpreterFactory>,
    outbound: OutboundSender,
    payload_url: String,
    entry_args: Vec<String>,
}

impl InterpreterLoader {
    /// Create a loader for the payload at `payload_url`.
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        factory: Arc<dyn InterpreterFactory>,
        outbound: OutboundSender,
        payload_url: impl Into<String>,
        entry_args: Vec<String>,
    ) -> Self {
        Self {
            fetcher,
            factory,
            outbound,
            payload_url: payload_url.into(),
            entry_args,
        }
    }

    /// Load the payload and boot the session.
    ///
    /// A duplicate trigger is rejected with `AlreadyLoading`/`AlreadyLoaded`
    /// without touching the network. A fetch or startup failure terminates
    /// the session with a single `debug` report and no `status: loaded`
    /// frame; there is no retry.
    pub async fn load(&self, session: &mut Session) -> Result<()> {
        session.begin_load()?;

        info!(url = %self.payload_url, "fetching interpreter payload");
        let fetcher = Arc::clone(&self.fetcher);
        let url = self.payload_url.clone();
        let fetched = tokio::task::spawn_blocking(move || fetcher.fetch(&url)).await;

        let payload = match fetched {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(e)) => {
                session.terminate(&format!("payload load failed: {e}"));
                return Err(BridgeError::LoadFailure(e.to_string()));
            }
            Err(e) => {
                session.terminate(&format!("payload fetch task failed: {e}"));
                return Err(BridgeError::LoadFailure(e.to_string()));
            }
        };
        info!(bytes = payload.len(), "payload fetched");

        session.begin_boot()?;

        // The payload's own filesystem initialization fixes the mount table;
        // no manifest registration is accepted past this point.
        session.env().fs.finalize();

        let env = Arc::clone(session.env());
        let interpreter = match self.factory.instantiate(payload, env) {
            Ok(interpreter) => interpreter,
            Err(reason) => {
                session.terminate(&format!("payload execution failed: {reason}"));
                return Err(BridgeError::LoadFailure(reason));
            }
        };

        self.outbound.status(Status::Loaded);
        session.complete_boot(interpreter, &self.entry_args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use crate::interpreter::{EvalFault, Interpreter, WorkerEnv};
    use crate::protocol::OutboundMessage;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc;

    struct CountingFetcher {
        body: Option<Vec<u8>>,
        calls: AtomicUsize,
    }

    impl CountingFetcher {
        fn serving(body: &[u8]) -> Arc<Self> {
            Arc::new(Self {
                body: Some(body.to_vec()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                body: None,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl Fetcher for CountingFetcher {
        fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.body.clone().ok_or(FetchError::Status {
                status: 404,
                url: url.to_string(),
            })
        }
    }

    struct NoopInterpreter;

    impl Interpreter for NoopInterpreter {
        fn start(&mut self, _args: &[String]) -> std::result::Result<(), EvalFault> {
            Ok(())
        }
        fn run_source(&mut self, _statement: &str) -> std::result::Result<(), EvalFault> {
            Ok(())
        }
        fn reclaim(&mut self) {}
    }

    struct NoopFactory {
        seen_payload: std::sync::Mutex<Vec<u8>>,
    }

    impl InterpreterFactory for NoopFactory {
        fn instantiate(
            &self,
            payload: Vec<u8>,
            env: Arc<WorkerEnv>,
        ) -> std::result::Result<Box<dyn Interpreter>, String> {
            assert!(env.fs.is_finalized(), "mount table must be fixed first");
            *self.seen_payload.lock().unwrap() = payload;
            Ok(Box::new(NoopInterpreter))
        }
    }

    fn setup(
        fetcher: Arc<CountingFetcher>,
    ) -> (
        InterpreterLoader,
        Session,
        mpsc::UnboundedReceiver<OutboundMessage>,
    ) {
        let (outbound, rx) = OutboundSender::channel();
        let env = Arc::new(WorkerEnv::new(outbound.clone(), fetcher.clone()));
        let session = Session::new(env, outbound.clone(), Vec::new());
        let factory = Arc::new(NoopFactory {
            seen_payload: std::sync::Mutex::new(Vec::new()),
        });
        let loader = InterpreterLoader::new(
            fetcher,
            factory,
            outbound,
            "http://host/interpreter.bin",
            Vec::new(),
        );
        (loader, session, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<OutboundMessage>) -> Vec<OutboundMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            out.push(msg);
        }
        out
    }

    #[tokio::test]
    async fn test_successful_load_emits_loaded_then_ready() {
        let (loader, mut session, mut rx) = setup(CountingFetcher::serving(b"payload"));

        loader.load(&mut session).await.unwrap();

        assert_eq!(session.state(), crate::session::SessionState::Ready);
        assert_eq!(
            drain(&mut rx),
            vec![
                OutboundMessage::Status(Status::Loaded),
                OutboundMessage::Status(Status::Ready),
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_terminates_without_loaded() {
        let (loader, mut session, mut rx) = setup(CountingFetcher::failing());

        let result = loader.load(&mut session).await;
        assert!(matches!(result, Err(BridgeError::LoadFailure(_))));
        assert!(session.state().is_terminal());

        let frames = drain(&mut rx);
        // Exactly one debug report describing the failure, nothing else
        assert_eq!(frames.len(), 1);
        assert!(
            matches!(&frames[0], OutboundMessage::Debug(m) if m.contains("load failed") && m.contains("404"))
        );
    }

    #[tokio::test]
    async fn test_second_load_rejected_without_refetch() {
        let fetcher = CountingFetcher::serving(b"payload");
        let (loader, mut session, _rx) = setup(fetcher.clone());

        loader.load(&mut session).await.unwrap();
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);

        let result = loader.load(&mut session).await;
        assert!(matches!(result, Err(BridgeError::AlreadyLoaded)));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_load_after_failure_rejected() {
        let (loader, mut session, _rx) = setup(CountingFetcher::failing());

        assert!(loader.load(&mut session).await.is_err());
        let result = loader.load(&mut session).await;
        assert!(matches!(result, Err(BridgeError::SessionTerminated)));
    }
}
