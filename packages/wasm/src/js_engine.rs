//! Bridge to the JavaScript editing engine constructed by the page

use crate::interop::{engine_error, value_from_js};
use inkframe_editor::{ContentSnapshot, EditorEngine, EngineError, EngineEvent};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// Editor object returned by the page's factory
    #[derive(Debug, Clone)]
    pub type JsEditor;

    /// The editor's command surface (`editor.commands`)
    #[derive(Debug, Clone)]
    pub type JsCommands;

    #[wasm_bindgen(method, getter)]
    fn commands(this: &JsEditor) -> JsCommands;

    #[wasm_bindgen(method, catch, js_name = setContent)]
    fn set_content(this: &JsCommands, content: &str, emit_update: bool) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = insertContent)]
    fn insert_content(this: &JsCommands, text: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = clearContent)]
    fn clear_content(this: &JsCommands, emit_update: bool) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn focus(this: &JsCommands) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = setEditable)]
    fn set_editable(this: &JsEditor, editable: bool) -> Result<(), JsValue>;

    #[wasm_bindgen(method, getter, js_name = isEditable)]
    fn is_editable(this: &JsEditor) -> bool;

    #[wasm_bindgen(method, getter, js_name = isFocused)]
    fn is_focused(this: &JsEditor) -> bool;

    #[wasm_bindgen(method, getter, js_name = isEmpty)]
    fn is_empty(this: &JsEditor) -> bool;

    #[wasm_bindgen(method, js_name = getHTML)]
    fn get_html(this: &JsEditor) -> String;

    #[wasm_bindgen(method, js_name = getText)]
    fn get_text(this: &JsEditor) -> String;

    #[wasm_bindgen(method, js_name = getJSON)]
    fn get_json(this: &JsEditor) -> JsValue;
}

/// Engine events pushed by JS callbacks, drained by the session
pub type EventQueue = Rc<RefCell<VecDeque<EngineEvent>>>;

pub struct JsEngine {
    editor: JsEditor,
    events: EventQueue,
}

impl JsEngine {
    pub fn new(editor: JsEditor, events: EventQueue) -> Self {
        Self { editor, events }
    }
}

// Replacing or clearing content must fire the engine's update callback so
// the parent hears about it; `emit_update` is passed explicitly for that.
impl EditorEngine for JsEngine {
    fn set_content(&mut self, content: &str) -> Result<(), EngineError> {
        self.editor
            .commands()
            .set_content(content, true)
            .map(drop)
            .map_err(|e| engine_error("setContent", e))
    }

    fn insert_content(&mut self, text: &str) -> Result<(), EngineError> {
        self.editor
            .commands()
            .insert_content(text)
            .map(drop)
            .map_err(|e| engine_error("insertContent", e))
    }

    fn clear_content(&mut self) -> Result<(), EngineError> {
        self.editor
            .commands()
            .clear_content(true)
            .map(drop)
            .map_err(|e| engine_error("clearContent", e))
    }

    fn set_editable(&mut self, editable: bool) -> Result<(), EngineError> {
        self.editor
            .set_editable(editable)
            .map_err(|e| engine_error("setEditable", e))
    }

    fn is_editable(&self) -> bool {
        self.editor.is_editable()
    }

    fn focus(&mut self) -> Result<(), EngineError> {
        self.editor
            .commands()
            .focus()
            .map(drop)
            .map_err(|e| engine_error("focus", e))
    }

    fn is_focused(&self) -> bool {
        self.editor.is_focused()
    }

    fn snapshot(&self) -> ContentSnapshot {
        ContentSnapshot {
            html: self.editor.get_html(),
            text: self.editor.get_text(),
            json: value_from_js(&self.editor.get_json()),
            is_empty: self.editor.is_empty(),
        }
    }

    fn poll_event(&mut self) -> Option<EngineEvent> {
        self.events.borrow_mut().pop_front()
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    /// Object shaped like a Tiptap `Editor`: content commands live under
    /// `commands`, state is exposed through getters
    fn tiptap_like() -> JsEditor {
        let build = js_sys::Function::new_no_args(
            r#"
            const editor = {
                html: "",
                editable: true,
                focused: false,
                emitted: [],
                get isEditable() { return this.editable; },
                get isFocused() { return this.focused; },
                get isEmpty() { return this.html === ""; },
                setEditable(value) { this.editable = value; },
                getHTML() { return this.html; },
                getText() { return this.html.replace(/<[^>]*>/g, ""); },
                getJSON() { return { type: "doc" }; },
            };
            editor.commands = {
                setContent(content, emitUpdate) { editor.html = content; editor.emitted.push(emitUpdate); return true; },
                insertContent(text) { editor.html += text; return true; },
                clearContent(emitUpdate) { editor.html = ""; editor.emitted.push(emitUpdate); return true; },
                focus() { editor.focused = true; return true; },
            };
            return editor;
            "#,
        );
        build.call0(&JsValue::NULL).unwrap().unchecked_into()
    }

    #[wasm_bindgen_test]
    fn test_commands_go_through_command_surface() {
        let editor = tiptap_like();
        let mut engine = JsEngine::new(editor.clone(), Rc::default());

        engine.set_content("<p>a</p>").unwrap();
        engine.insert_content("b").unwrap();
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.html, "<p>a</p>b");
        assert_eq!(snapshot.text, "ab");
        assert!(!snapshot.is_empty);

        engine.clear_content().unwrap();
        assert!(engine.snapshot().is_empty);

        engine.focus().unwrap();
        assert!(engine.is_focused());

        engine.set_editable(false).unwrap();
        assert!(!engine.is_editable());

        let emitted = js_sys::Reflect::get(&editor, &JsValue::from_str("emitted")).unwrap();
        assert_eq!(
            crate::interop::value_from_js(&emitted),
            serde_json::json!([true, true])
        );
    }

    #[wasm_bindgen_test]
    fn test_missing_command_is_an_engine_error() {
        let editor: JsEditor = js_sys::Function::new_no_args("return { commands: {} };")
            .call0(&JsValue::NULL)
            .unwrap()
            .unchecked_into();
        let mut engine = JsEngine::new(editor, Rc::default());

        let err = engine.set_content("x").unwrap_err();
        assert_eq!(err.message, "setContent failed");
        assert!(err.details.is_some());
    }
}
