//! Session lifecycle state machine.

/// Lifecycle state of the worker's single interpreter session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No payload fetched yet.
    #[default]
    Unloaded,
    /// Payload fetch in progress.
    Loading,
    /// Runtime startup and console construction running.
    Booting,
    /// Idle, accepting at most one command.
    Ready,
    /// A command is being pushed into the interactive console.
    Evaluating,
    /// Unrecoverable; only a worker restart leaves this state.
    Terminated,
}

impl SessionState {
    /// Check if transition to target state is valid.
    ///
    /// Valid transitions:
    /// - Unloaded -> Loading
    /// - Loading -> Booting
    /// - Booting -> Ready
    /// - Ready -> Evaluating
    /// - Evaluating -> Ready
    /// - Loading | Booting | Ready | Evaluating -> Terminated
    pub fn can_transition_to(&self, target: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (*self, target),
            (Unloaded, Loading)
                | (Loading, Booting)
                | (Booting, Ready)
                | (Ready, Evaluating)
                | (Evaluating, Ready)
                | (Loading, Terminated)
                | (Booting, Terminated)
                | (Ready, Terminated)
                | (Evaluating, Terminated)
        )
    }

    /// Attempt to transition to a new state.
    ///
    /// Returns `Ok(())` if the transition is valid, or an error otherwise.
    pub fn transition_to(&mut self, target: SessionState) -> crate::Result<()> {
        if self.can_transition_to(target) {
            *self = target;
            Ok(())
        } else {
            Err(crate::error::BridgeError::InvalidStateTransition {
                from: *self,
                to: target,
            })
        }
    }

    /// Check if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Terminated)
    }

    /// Check if the session can accept a command right now.
    ///
    /// Only `Ready` accepts; anywhere else a submission is a `NotReady`
    /// protocol error, never queued.
    pub fn can_accept(&self) -> bool {
        matches!(self, SessionState::Ready)
    }
}
