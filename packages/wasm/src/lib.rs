//! Browser binding for the Inkframe embedded editor
//!
//! The page creates an `EmbeddedEditor`, then mounts it with a factory that
//! builds the JS editing engine and forwards the engine's lifecycle hooks:
//!
//! ```js
//! const inkframe = new EmbeddedEditor();
//! inkframe.mount((options) => new Editor({
//!   ...options,
//!   onCreate: () => inkframe.engineCreated(),
//!   onUpdate: () => inkframe.engineUpdated(),
//!   onFocus: () => inkframe.engineFocused(),
//!   onBlur: () => inkframe.engineBlurred(),
//! }));
//! ```
//!
//! The returned object is used the way a Tiptap `Editor` is: content and focus
//! go through `editor.commands`, state is read from `isEditable`, `isFocused`
//! and `isEmpty`, and `options.theme` is the theme already applied to the page.

mod interop;
mod js_engine;
mod logging;
mod window_host;

use inkframe_editor::{
    EditorError, EngineError, EngineEvent, EngineOptions, InitialConfig, Session,
    ACCESS_DENIED_MESSAGE, READY_DELAY,
};
use interop::{describe_js_error, engine_error, to_js, value_from_js};
use js_engine::{EventQueue, JsEditor, JsEngine};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{MediaQueryListEvent, MessageEvent, Window};
use window_host::{WindowHost, DARK_SCHEME_QUERY};

type WebSession = Session<WindowHost, JsEngine>;

/// Access key baked in at build time
const ACCESS_KEY: Option<&str> = option_env!("INKFRAME_ACCESS_KEY");

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init();
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct EmbeddedEditor {
    events: EventQueue,
    session: RefCell<Option<Rc<RefCell<WebSession>>>>,
    config: RefCell<Option<InitialConfig>>,
    disabled: Cell<bool>,
}

impl Default for EmbeddedEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl EmbeddedEditor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> EmbeddedEditor {
        EmbeddedEditor {
            events: Rc::default(),
            session: RefCell::new(None),
            config: RefCell::new(None),
            disabled: Cell::new(false),
        }
    }

    /// Resolve the configuration from the page URL and start the session.
    ///
    /// A rejected access key renders the access-denied indicator and leaves
    /// the editor disabled; that is not an error for the caller.
    pub fn mount(&self, factory: &js_sys::Function) -> Result<(), JsValue> {
        if self.session.borrow().is_some() || self.disabled.get() {
            return Err(JsValue::from_str("Editor already mounted"));
        }

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        let query = window.location().search()?;
        let config = InitialConfig::from_query(&query, ACCESS_KEY);
        *self.config.borrow_mut() = Some(config.clone());

        let events = self.events.clone();
        let build_engine = move |options: &EngineOptions| -> Result<JsEngine, EngineError> {
            let options = to_js(options).map_err(|e| engine_error("Engine options", e))?;
            let editor = factory
                .call1(&JsValue::NULL, &options)
                .map_err(|e| engine_error("Engine construction", e))?;
            Ok(JsEngine::new(editor.unchecked_into::<JsEditor>(), events))
        };

        let session = match Session::mount(config, WindowHost::new(window.clone()), build_engine) {
            Ok(session) => Rc::new(RefCell::new(session)),
            Err(EditorError::AccessDenied) => {
                self.disabled.set(true);
                render_access_denied(&window)?;
                return Ok(());
            }
            Err(e) => return Err(js_error(e)),
        };

        subscribe_messages(&window, &session)?;
        start_ready_timer(&window, &session)?;
        subscribe_color_scheme(&window, &session)?;

        *self.session.borrow_mut() = Some(session);
        Ok(())
    }

    #[wasm_bindgen(js_name = engineCreated)]
    pub fn engine_created(&self) {
        self.push_event(EngineEvent::Created);
    }

    #[wasm_bindgen(js_name = engineUpdated)]
    pub fn engine_updated(&self) {
        self.push_event(EngineEvent::Updated);
    }

    #[wasm_bindgen(js_name = engineFocused)]
    pub fn engine_focused(&self) {
        self.push_event(EngineEvent::Focused);
    }

    #[wasm_bindgen(js_name = engineBlurred)]
    pub fn engine_blurred(&self) {
        self.push_event(EngineEvent::Blurred);
    }

    /// True when the access gate rejected this page
    #[wasm_bindgen(getter, js_name = isDisabled)]
    pub fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    /// The resolved startup configuration, `undefined` before mount
    #[wasm_bindgen(getter)]
    pub fn config(&self) -> Result<JsValue, JsValue> {
        match self.config.borrow().as_ref() {
            Some(config) => to_js(config),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Remove every listener and pending timer. Safe to call twice.
    pub fn destroy(&self) {
        let Some(session) = self.session.borrow_mut().take() else {
            return;
        };
        match session.try_borrow_mut() {
            Ok(mut session) => session.teardown(),
            Err(_) => warn!("Editor busy during destroy, teardown skipped"),
        }
        self.events.borrow_mut().clear();
        info!("Embedded editor destroyed");
    }
}

impl EmbeddedEditor {
    /// Queue an engine event and drain it unless the session is already
    /// running, in which case its own pump picks the event up.
    fn push_event(&self, event: EngineEvent) {
        self.events.borrow_mut().push_back(event);
        let session = self.session.borrow().clone();
        if let Some(session) = session {
            if let Ok(mut session) = session.try_borrow_mut() {
                session.pump();
            }
        }
    }
}

fn render_access_denied(window: &Window) -> Result<(), JsValue> {
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("No document"))?;
    let indicator = document.create_element("div")?;
    indicator.set_class_name("access-denied");
    indicator.set_text_content(Some(ACCESS_DENIED_MESSAGE));
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("No document body"))?;
    body.append_child(&indicator)?;
    Ok(())
}

fn with_session(weak: &Weak<RefCell<WebSession>>, f: impl FnOnce(&mut WebSession)) {
    let Some(session) = weak.upgrade() else {
        return;
    };
    match session.try_borrow_mut() {
        Ok(mut session) => f(&mut session),
        Err(_) => warn!("Editor busy, browser event dropped"),
    };
}

fn subscribe_messages(window: &Window, session: &Rc<RefCell<WebSession>>) -> Result<(), JsValue> {
    let weak = Rc::downgrade(session);
    let listener = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
        let source = event.source();
        let data = value_from_js(&event.data());
        with_session(&weak, |session| session.handle_message(&source, &data));
    });
    window.add_event_listener_with_callback("message", listener.as_ref().unchecked_ref())?;

    let target = window.clone();
    session.borrow_mut().subscriptions_mut().add("message", move || {
        if let Err(e) =
            target.remove_event_listener_with_callback("message", listener.as_ref().unchecked_ref())
        {
            warn!(error = %describe_js_error(&e), "Failed to remove message listener");
        }
        drop(listener);
    });
    Ok(())
}

fn start_ready_timer(window: &Window, session: &Rc<RefCell<WebSession>>) -> Result<(), JsValue> {
    let weak = Rc::downgrade(session);
    let callback = Closure::<dyn FnMut()>::new(move || {
        with_session(&weak, |session| session.ready_timer_fired());
    });
    let handle = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        READY_DELAY.as_millis() as i32,
    )?;

    let target = window.clone();
    session.borrow_mut().subscriptions_mut().add("ready-timer", move || {
        target.clear_timeout_with_handle(handle);
        drop(callback);
    });
    Ok(())
}

fn subscribe_color_scheme(window: &Window, session: &Rc<RefCell<WebSession>>) -> Result<(), JsValue> {
    let Some(query) = window.match_media(DARK_SCHEME_QUERY)? else {
        return Ok(());
    };

    let weak = Rc::downgrade(session);
    let listener = Closure::<dyn FnMut(MediaQueryListEvent)>::new(move |event: MediaQueryListEvent| {
        with_session(&weak, |session| session.color_scheme_changed(event.matches()));
    });
    query.add_event_listener_with_callback("change", listener.as_ref().unchecked_ref())?;

    session.borrow_mut().subscriptions_mut().add("color-scheme", move || {
        if let Err(e) =
            query.remove_event_listener_with_callback("change", listener.as_ref().unchecked_ref())
        {
            warn!(error = %describe_js_error(&e), "Failed to remove color scheme listener");
        }
        drop(listener);
    });
    Ok(())
}
