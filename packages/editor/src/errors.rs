//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Invalid access key")]
    AccessDenied,

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),
}

/// Failure to turn raw input (query parameters, inbound messages) into typed values
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Malformed URL-encoded parameter `{name}`")]
    Parameter { name: &'static str },

    #[error("Message has no `type` field")]
    MissingType,

    #[error("Unknown message type: {0}")]
    UnknownType(String),

    #[error("Malformed {kind} message: {source}")]
    Malformed {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    /// Handler-level failures are reported back to the parent; the rest are dropped locally
    pub fn is_reportable(&self) -> bool {
        matches!(self, DecodeError::Malformed { .. })
    }
}

/// An operation on the embedded editing engine failed
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct EngineError {
    pub message: String,
    pub details: Option<String>,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("Not embedded: no parent window")]
    NoParent,

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Post failed: {0}")]
    Post(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_malformed_payloads_are_reportable() {
        assert!(!DecodeError::MissingType.is_reportable());
        assert!(!DecodeError::UnknownType("UNKNOWN_CMD".to_string()).is_reportable());

        let source = serde_json::from_str::<bool>("\"yes\"").unwrap_err();
        let err = DecodeError::Malformed {
            kind: "SET_EDITABLE".to_string(),
            source,
        };
        assert!(err.is_reportable());
        assert!(err.to_string().starts_with("Malformed SET_EDITABLE message"));
    }

    #[test]
    fn test_engine_error_display() {
        let err = EngineError::new("setContent threw").with_details("RangeError");
        assert_eq!(err.to_string(), "setContent threw");
        assert_eq!(err.details.as_deref(), Some("RangeError"));
    }
}
