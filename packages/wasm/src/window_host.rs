//! Browser window as the editor's host

use crate::interop::{describe_js_error, value_to_js};
use inkframe_editor::{ChannelError, HostWindow, Theme};
use js_sys::Object;
use serde_json::Value;
use tracing::debug;
use web_sys::Window;

pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

pub struct WindowHost {
    window: Window,
}

impl WindowHost {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    /// The embedding parent, looked up fresh each time. A top-level page is
    /// its own parent and counts as not embedded.
    fn parent(&self) -> Option<Window> {
        let parent = self.window.parent().ok().flatten()?;
        if Object::is(&parent, &self.window) {
            None
        } else {
            Some(parent)
        }
    }
}

impl HostWindow for WindowHost {
    type Source = Option<Object>;

    fn is_parent(&self, source: &Option<Object>) -> bool {
        match (source, self.parent()) {
            (Some(source), Some(parent)) => Object::is(source, &parent),
            _ => false,
        }
    }

    fn post_to_parent(&self, message: &Value) -> Result<(), ChannelError> {
        let parent = self.parent().ok_or(ChannelError::NoParent)?;
        let message = value_to_js(message).map_err(|e| ChannelError::Post(describe_js_error(&e)))?;
        parent
            .post_message(&message, "*")
            .map_err(|e| ChannelError::Post(describe_js_error(&e)))
    }

    fn set_dark_class(&self, dark: bool) {
        let Some(root) = self.window.document().and_then(|d| d.document_element()) else {
            return;
        };
        if let Err(e) = root.class_list().toggle_with_force("dark", dark) {
            debug!(error = %describe_js_error(&e), "Failed to toggle theme class");
        }
    }

    fn theme_hint(&self) -> Option<Theme> {
        self.window
            .document()
            .and_then(|d| d.document_element())
            .and_then(|root| root.get_attribute("data-theme"))
            .and_then(|value| Theme::parse(&value))
    }

    fn prefers_dark(&self) -> bool {
        self.window
            .match_media(DARK_SCHEME_QUERY)
            .ok()
            .flatten()
            .is_some_and(|query| query.matches())
    }
}
