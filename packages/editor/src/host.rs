//! # Host Window
//!
//! The platform the editor is embedded in: who the parent is, how to reach
//! it, and the few page-level facts the session needs at mount.

use crate::{ChannelError, Theme};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// Platform seam for the embedding page
pub trait HostWindow {
    /// Identity of an inbound message's sender
    type Source;

    /// Whether `source` is the embedding parent window.
    ///
    /// Asked for every inbound message; implementations must not cache the
    /// answer. A page that is not embedded has no parent.
    fn is_parent(&self, source: &Self::Source) -> bool;

    /// Post a structured message to the parent with target origin `*`
    fn post_to_parent(&self, message: &Value) -> Result<(), ChannelError>;

    /// Toggle the dark presentation class on the document root
    fn set_dark_class(&self, dark: bool);

    /// Theme marker declared by the embedding page, read once at mount
    fn theme_hint(&self) -> Option<Theme> {
        None
    }

    /// Current ambient color-scheme preference
    fn prefers_dark(&self) -> bool {
        false
    }
}

/// Sender of a message delivered to a [`RecordingHost`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSource {
    Parent,
    /// The editor's own window
    Window,
    /// Any other frame or window
    Other,
}

#[derive(Debug, Default)]
struct Recorded {
    posted: Vec<Value>,
    dark_class: Option<bool>,
    theme_writes: usize,
}

/// In-memory host that records everything posted to the parent.
///
/// Clones share the same record, so a caller can keep one handle while the
/// session owns another.
#[derive(Debug, Clone)]
pub struct RecordingHost {
    embedded: bool,
    theme_hint: Option<Theme>,
    prefers_dark: bool,
    record: Rc<RefCell<Recorded>>,
}

impl RecordingHost {
    /// Host embedded in a parent window
    pub fn embedded() -> Self {
        Self {
            embedded: true,
            theme_hint: None,
            prefers_dark: false,
            record: Rc::default(),
        }
    }

    /// Top-level page with no parent
    pub fn standalone() -> Self {
        Self {
            embedded: false,
            ..Self::embedded()
        }
    }

    pub fn with_theme_hint(mut self, hint: Theme) -> Self {
        self.theme_hint = Some(hint);
        self
    }

    pub fn with_prefers_dark(mut self, prefers_dark: bool) -> Self {
        self.prefers_dark = prefers_dark;
        self
    }

    /// Everything posted so far, oldest first
    pub fn posted(&self) -> Vec<Value> {
        self.record.borrow().posted.clone()
    }

    /// Drain the posted messages
    pub fn take_posted(&self) -> Vec<Value> {
        std::mem::take(&mut self.record.borrow_mut().posted)
    }

    /// `type` fields of everything posted so far
    pub fn posted_types(&self) -> Vec<String> {
        self.record
            .borrow()
            .posted
            .iter()
            .filter_map(|m| m.get("type").and_then(Value::as_str).map(str::to_string))
            .collect()
    }

    /// Last value written to the dark class, if any
    pub fn dark_class(&self) -> Option<bool> {
        self.record.borrow().dark_class
    }

    /// Number of theme class writes
    pub fn theme_writes(&self) -> usize {
        self.record.borrow().theme_writes
    }
}

impl HostWindow for RecordingHost {
    type Source = MessageSource;

    fn is_parent(&self, source: &MessageSource) -> bool {
        self.embedded && *source == MessageSource::Parent
    }

    fn post_to_parent(&self, message: &Value) -> Result<(), ChannelError> {
        if !self.embedded {
            return Err(ChannelError::NoParent);
        }
        self.record.borrow_mut().posted.push(message.clone());
        Ok(())
    }

    fn set_dark_class(&self, dark: bool) {
        let mut record = self.record.borrow_mut();
        record.dark_class = Some(dark);
        record.theme_writes += 1;
    }

    fn theme_hint(&self) -> Option<Theme> {
        self.theme_hint
    }

    fn prefers_dark(&self) -> bool {
        self.prefers_dark
    }
}
