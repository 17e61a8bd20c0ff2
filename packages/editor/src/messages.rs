//! # Wire Messages
//!
//! Tagged JSON objects exchanged with the embedding parent window.
//!
//! Every message carries a `type` discriminator:
//!
//! ```text
//! parent → editor   SET_CONTENT  SET_EDITABLE  FOCUS  INSERT_TEXT  CLEAR
//! editor → parent   CONTENT_CHANGE  EDITOR_READY  EDITOR_FOCUS  EDITOR_BLUR
//!                   EDITOR_ERROR  COMMAND_EXECUTED
//! ```
//!
//! Inbound decoding distinguishes three outcomes so the session can treat them
//! differently: no discriminator at all, a discriminator nobody knows, and a
//! known discriminator with a broken payload.

use crate::DecodeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Command sent by the parent window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InboundCommand {
    /// Replace the whole document
    SetContent {
        #[serde(default)]
        content: Option<String>,
    },

    /// Toggle editability
    SetEditable { editable: bool },

    /// Request input focus
    Focus,

    /// Insert at the current cursor/selection
    InsertText {
        #[serde(default)]
        text: Option<String>,
    },

    /// Remove all content
    Clear,
}

impl InboundCommand {
    /// Discriminators understood by the dispatcher
    pub const TYPES: [&'static str; 5] = [
        "SET_CONTENT",
        "SET_EDITABLE",
        "FOCUS",
        "INSERT_TEXT",
        "CLEAR",
    ];

    /// Decode a raw inbound message
    pub fn decode(data: &Value) -> Result<Self, DecodeError> {
        let kind = match data.get("type") {
            None | Some(Value::Null) | Some(Value::Bool(false)) => {
                return Err(DecodeError::MissingType)
            }
            Some(Value::String(kind)) if kind.is_empty() => return Err(DecodeError::MissingType),
            Some(Value::String(kind)) => kind.as_str(),
            Some(other) => return Err(DecodeError::UnknownType(other.to_string())),
        };

        if !Self::TYPES.contains(&kind) {
            return Err(DecodeError::UnknownType(kind.to_string()));
        }

        serde_json::from_value(data.clone()).map_err(|source| DecodeError::Malformed {
            kind: kind.to_string(),
            source,
        })
    }

    /// Wire discriminator of this command
    pub fn kind(&self) -> &'static str {
        match self {
            InboundCommand::SetContent { .. } => "SET_CONTENT",
            InboundCommand::SetEditable { .. } => "SET_EDITABLE",
            InboundCommand::Focus => "FOCUS",
            InboundCommand::InsertText { .. } => "INSERT_TEXT",
            InboundCommand::Clear => "CLEAR",
        }
    }
}

/// Event sent to the parent window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutboundEvent {
    /// Document changed, with every projection the engine offers
    #[serde(rename = "CONTENT_CHANGE")]
    ContentChanged {
        content: String,
        text: String,
        json: Value,
        #[serde(rename = "isEmpty")]
        is_empty: bool,
    },

    #[serde(rename = "EDITOR_READY")]
    Ready,

    #[serde(rename = "EDITOR_FOCUS")]
    Focused,

    #[serde(rename = "EDITOR_BLUR")]
    Blurred,

    /// A valid command could not be applied
    #[serde(rename = "EDITOR_ERROR")]
    Error { error: String, details: String },

    /// Acknowledgement, only when the session was configured with `ack=true`
    #[serde(rename = "COMMAND_EXECUTED")]
    CommandExecuted { command: String },
}

impl OutboundEvent {
    /// Build a CONTENT_CHANGE from an engine snapshot
    pub fn content_changed(snapshot: crate::ContentSnapshot) -> Self {
        OutboundEvent::ContentChanged {
            content: snapshot.html,
            text: snapshot.text,
            json: snapshot.json,
            is_empty: snapshot.is_empty,
        }
    }

    /// Error report sent when handling a command fails
    pub fn handler_error(details: impl Into<String>) -> Self {
        OutboundEvent::Error {
            error: "Failed to handle message".to_string(),
            details: details.into(),
        }
    }

    /// Wire discriminator of this event
    pub fn kind(&self) -> &'static str {
        match self {
            OutboundEvent::ContentChanged { .. } => "CONTENT_CHANGE",
            OutboundEvent::Ready => "EDITOR_READY",
            OutboundEvent::Focused => "EDITOR_FOCUS",
            OutboundEvent::Blurred => "EDITOR_BLUR",
            OutboundEvent::Error { .. } => "EDITOR_ERROR",
            OutboundEvent::CommandExecuted { .. } => "COMMAND_EXECUTED",
        }
    }

    /// Serialize into the structured message posted to the parent
    pub fn to_message(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
