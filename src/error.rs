//! Error types for repl-bridge.

use thiserror::Error;

/// Main error type for repl-bridge operations.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The interpreter payload could not be fetched or executed.
    #[error("payload load failed: {0}")]
    LoadFailure(String),

    /// A lazily-fetched file could not be retrieved.
    #[error("resource unavailable for '{path}': {reason}")]
    ResourceUnavailable { path: String, reason: String },

    /// A path was opened that no manifest entry covers.
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// A load was triggered while another is in progress.
    #[error("payload load already in progress")]
    AlreadyLoading,

    /// A load was triggered after a previous load completed.
    #[error("payload already loaded")]
    AlreadyLoaded,

    /// The lazy filesystem manifest was registered after finalization.
    #[error("lazy filesystem already initialized")]
    AlreadyInitialized,

    /// A command was submitted while the session cannot accept one.
    #[error("session not ready: current state is {0:?}")]
    NotReady(crate::session::SessionState),

    /// The interpreter reported a runtime fault for a command.
    #[error("evaluation fault: {0}")]
    EvaluationFault(String),

    /// Invalid state transition attempted.
    #[error("invalid state transition from {from:?} to {to:?}")]
    InvalidStateTransition {
        from: crate::session::SessionState,
        to: crate::session::SessionState,
    },

    /// The session reached its terminal state and cannot be reused.
    #[error("session terminated")]
    SessionTerminated,

    /// The outbound message channel was closed by the host side.
    #[error("outbound channel closed")]
    ChannelClosed,

    /// Internal lock was poisoned.
    #[error("internal lock poisoned")]
    LockPoisoned,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for repl-bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;
