//! # Editability/Focus Reconciler
//!
//! Shadow of the editable and focused flags as last requested by the parent
//! or reported by the engine. Engine writes only happen when the engine
//! disagrees with the shadow.

use crate::{EditorEngine, EngineError, EngineEvent};
use tracing::debug;

/// Requested editable/focused state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateShadow {
    pub editable: bool,
    pub focused: bool,
}

#[derive(Debug)]
pub struct Reconciler {
    shadow: StateShadow,
}

impl Reconciler {
    pub fn new(editable: bool) -> Self {
        Self {
            shadow: StateShadow {
                editable,
                focused: false,
            },
        }
    }

    pub fn shadow(&self) -> StateShadow {
        self.shadow
    }

    /// Record the requested editability and propagate it if the engine differs.
    ///
    /// Returns whether the engine was written.
    pub fn request_editable<E: EditorEngine>(
        &mut self,
        engine: &mut E,
        editable: bool,
    ) -> Result<bool, EngineError> {
        self.shadow.editable = editable;
        if engine.is_editable() == editable {
            debug!(editable, "Editability unchanged, skipping engine write");
            return Ok(false);
        }
        engine.set_editable(editable)?;
        Ok(true)
    }

    /// Record focus intent and ask the engine for focus
    pub fn request_focus<E: EditorEngine>(&mut self, engine: &mut E) -> Result<(), EngineError> {
        self.shadow.focused = true;
        if engine.is_focused() {
            return Ok(());
        }
        engine.focus()
    }

    /// Track focus transitions reported by the engine
    pub fn observe(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Focused => self.shadow.focused = true,
            EngineEvent::Blurred => self.shadow.focused = false,
            EngineEvent::Created | EngineEvent::Updated => {}
        }
    }

    /// Bring the engine back in line with the shadow.
    ///
    /// Focus is re-requested when the shadow is focused but the engine lost
    /// focus without reporting a blur.
    pub fn reconcile<E: EditorEngine>(&mut self, engine: &mut E) -> Result<(), EngineError> {
        if engine.is_editable() != self.shadow.editable {
            debug!(editable = self.shadow.editable, "Restoring editability");
            engine.set_editable(self.shadow.editable)?;
        }

        if self.shadow.focused && !engine.is_focused() {
            debug!("Restoring focus");
            engine.focus()?;
        }

        Ok(())
    }
}
