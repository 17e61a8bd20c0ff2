//! # Editing Engine Seam
//!
//! The rich-text engine (document model, rendering, low-level editing
//! commands) is external. The session only needs the handful of operations
//! below plus a way to observe what the engine did.
//!
//! Engines report lifecycle and content events by queueing them; the session
//! drains the queue with [`EditorEngine::poll_event`] after every stimulus.
//! This keeps engine callbacks that fire in the middle of a command from
//! re-entering the session.

use crate::{EngineError, Theme};
use serde::Serialize;
use serde_json::Value;

/// Something the engine observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// Construction finished
    Created,

    /// Document changed (local typing or a command)
    Updated,

    Focused,

    Blurred,
}

/// Projections of the current document
#[derive(Debug, Clone, PartialEq)]
pub struct ContentSnapshot {
    pub html: String,
    pub text: String,
    pub json: Value,
    pub is_empty: bool,
}

/// Options an engine is constructed with
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineOptions {
    pub content: String,
    pub editable: bool,
    pub placeholder: String,
    pub show_toolbar: bool,

    /// Theme applied to the page at mount
    pub theme: Theme,
}

/// Operations the session performs on the embedded engine
pub trait EditorEngine {
    /// Replace the document wholesale
    fn set_content(&mut self, content: &str) -> Result<(), EngineError>;

    /// Insert at the current cursor/selection
    fn insert_content(&mut self, text: &str) -> Result<(), EngineError>;

    /// Remove all content
    fn clear_content(&mut self) -> Result<(), EngineError>;

    fn set_editable(&mut self, editable: bool) -> Result<(), EngineError>;

    fn is_editable(&self) -> bool;

    /// Request input focus
    fn focus(&mut self) -> Result<(), EngineError>;

    fn is_focused(&self) -> bool;

    fn snapshot(&self) -> ContentSnapshot;

    /// Next queued event, oldest first
    fn poll_event(&mut self) -> Option<EngineEvent>;
}
