//! # Command Dispatch
//!
//! Applies a decoded [`InboundCommand`] to the engine. Each command touches
//! only the state it names:
//!
//! - `SetContent` / `InsertText` / `Clear` mutate the document
//! - `SetEditable` changes editability (through the reconciler)
//! - `Focus` requests focus (through the reconciler)

use crate::{EditorEngine, EngineError, InboundCommand, Reconciler};

impl InboundCommand {
    /// Apply this command to a constructed engine
    pub fn apply<E: EditorEngine>(
        &self,
        engine: &mut E,
        reconciler: &mut Reconciler,
    ) -> Result<(), EngineError> {
        match self {
            InboundCommand::SetContent { content } => {
                engine.set_content(content.as_deref().unwrap_or(""))
            }

            InboundCommand::SetEditable { editable } => {
                reconciler.request_editable(engine, *editable).map(|_| ())
            }

            InboundCommand::Focus => reconciler.request_focus(engine),

            InboundCommand::InsertText { text } => {
                engine.insert_content(text.as_deref().unwrap_or(""))
            }

            InboundCommand::Clear => engine.clear_content(),
        }
    }
}
