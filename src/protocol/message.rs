//! Wire message types for the host/worker protocol.
//!
//! Every frame is a JSON object with a `type` tag and a `data` payload, e.g.
//! `{"type": "stdout", "data": "welcome\n"}`.

use serde::{Deserialize, Serialize};

/// Message received from the host.
///
/// `input` is the only inbound message type; everything else the host wants
/// (loading, shutdown) happens through the worker lifecycle itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InboundMessage {
    /// One unit of interactive source text to evaluate.
    Input {
        /// Raw source text.
        data: String,
        /// Suppress the intermediate `status: working` frame.
        #[serde(default)]
        silent: bool,
    },
}

/// Message sent to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum OutboundMessage {
    /// Diagnostic text from the bridge itself.
    Debug(String),
    /// A chunk of interpreter stdout, relayed verbatim.
    Stdout(String),
    /// A chunk of interpreter stderr, relayed verbatim.
    Stderr(String),
    /// Lifecycle status change.
    Status(Status),
}

/// Session lifecycle status values visible to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The payload has been executed and its startup routine begun.
    Loaded,
    /// A command is being evaluated.
    Working,
    /// The session is idle and accepting commands.
    Ready,
}

impl OutboundMessage {
    /// Shorthand for a `debug` frame.
    pub fn debug(text: impl Into<String>) -> Self {
        Self::Debug(text.into())
    }

    /// Shorthand for a `stdout` frame.
    pub fn stdout(chunk: impl Into<String>) -> Self {
        Self::Stdout(chunk.into())
    }

    /// Shorthand for a `stderr` frame.
    pub fn stderr(chunk: impl Into<String>) -> Self {
        Self::Stderr(chunk.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_input_parse() {
        let json = r#"{"type": "input", "data": "print('hi')"}"#;
        let msg: InboundMessage = serde_json::from_str(json).unwrap();
        assert_eq!(
            msg,
            InboundMessage::Input {
                data: "print('hi')".to_string(),
                silent: false,
            }
        );
    }

    #[test]
    fn test_inbound_input_silent() {
        let json = r#"{"type": "input", "data": "x = 1", "silent": true}"#;
        let msg: InboundMessage = serde_json::from_str(json).unwrap();
        assert_eq!(
            msg,
            InboundMessage::Input {
                data: "x = 1".to_string(),
                silent: true,
            }
        );
    }

    #[test]
    fn test_inbound_unknown_type_rejected() {
        let json = r#"{"type": "interrupt", "data": ""}"#;
        let result: Result<InboundMessage, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_outbound_stdout_wire_form() {
        let msg = OutboundMessage::stdout("welcome\n");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"type":"stdout","data":"welcome\n"}"#);
    }

    #[test]
    fn test_outbound_status_wire_form() {
        let msg = OutboundMessage::Status(Status::Loaded);
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"type":"status","data":"loaded"}"#);

        let msg = OutboundMessage::Status(Status::Working);
        assert!(serde_json::to_string(&msg).unwrap().contains("working"));

        let msg = OutboundMessage::Status(Status::Ready);
        assert!(serde_json::to_string(&msg).unwrap().contains("ready"));
    }

    #[test]
    fn test_outbound_roundtrip() {
        let msg = OutboundMessage::stderr("ZeroDivisionError: division by zero\n");
        let json = serde_json::to_string(&msg).unwrap();
        let back: OutboundMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
