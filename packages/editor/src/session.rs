//! # Editor Session
//!
//! One embedded editor bound to one parent window.
//!
//! The session owns everything with a lifetime: the engine, the message
//! channel, the reconciler shadow, the emitter's ready state and the list of
//! platform subscriptions. The platform drives it with four stimuli:
//!
//! ```text
//! message from a window  → handle_message()
//! engine callback        → pump()
//! ready delay elapsed    → ready_timer_fired()
//! color scheme changed   → color_scheme_changed()
//! ```
//!
//! and ends it with `teardown()`.

use crate::{
    EditorEngine, EditorError, EngineError, EngineOptions, EventEmitter, HostWindow,
    InitialConfig, MessageChannel, OutboundEvent, Reconciler, StateShadow, Subscriptions, Theme,
};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Delay between listener registration and the ready announcement
pub const READY_DELAY: Duration = Duration::from_millis(100);

/// Text rendered instead of the editor when the access gate rejects the page
pub const ACCESS_DENIED_MESSAGE: &str = "Invalid Access Key";

pub struct Session<H: HostWindow, E: EditorEngine> {
    config: InitialConfig,
    channel: MessageChannel<H>,
    engine: E,
    reconciler: Reconciler,
    emitter: EventEmitter,
    subscriptions: Subscriptions,
    theme: Option<Theme>,
    closed: bool,
}

impl<H: HostWindow, E: EditorEngine> Session<H, E> {
    /// Mount a session.
    ///
    /// Checks the access gate before anything else. A rejected page gets
    /// `EditorError::AccessDenied`, no engine and no theme write.
    pub fn mount<F>(config: InitialConfig, host: H, build_engine: F) -> Result<Self, EditorError>
    where
        F: FnOnce(&EngineOptions) -> Result<E, EngineError>,
    {
        if let Err(e) = config.authorize() {
            warn!("Access key rejected, editor disabled");
            return Err(e);
        }

        let theme = Theme::resolve(config.theme, host.theme_hint(), host.prefers_dark());
        let engine = build_engine(&config.engine_options(theme))?;
        let mut session = Self {
            reconciler: Reconciler::new(config.editable),
            config,
            channel: MessageChannel::new(host),
            engine,
            emitter: EventEmitter::new(),
            subscriptions: Subscriptions::new(),
            theme: None,
            closed: false,
        };

        session.apply_theme(theme);
        session.pump();

        info!(
            editable = session.config.editable,
            show_toolbar = session.config.show_toolbar,
            theme = ?theme,
            "Editor session mounted"
        );
        Ok(session)
    }

    /// Handle a raw message delivered to the editor's window
    pub fn handle_message(&mut self, source: &H::Source, data: &Value) {
        if self.closed {
            return;
        }

        let Some(received) = self.channel.receive(source, data) else {
            return;
        };

        if !self.emitter.is_ready() {
            debug!("Dropping message received before ready");
            return;
        }

        let command = match received {
            Ok(command) => command,
            Err(e) => {
                warn!(error = %e, "Failed to handle message");
                self.emitter
                    .emit(&self.channel, OutboundEvent::handler_error(e.to_string()));
                return;
            }
        };

        debug!(kind = command.kind(), "Applying command");
        let result = command.apply(&mut self.engine, &mut self.reconciler);
        self.pump();

        match result {
            Ok(()) => {
                if self.config.acknowledge_commands {
                    self.emitter.emit(
                        &self.channel,
                        OutboundEvent::CommandExecuted {
                            command: command.kind().to_string(),
                        },
                    );
                }
            }
            Err(e) => {
                warn!(kind = command.kind(), error = %e, "Failed to handle message");
                let details = match e.details {
                    Some(details) => format!("{}: {}", e.message, details),
                    None => e.message,
                };
                self.emitter
                    .emit(&self.channel, OutboundEvent::handler_error(details));
            }
        }
    }

    /// Drain and publish everything the engine reported, then reconcile
    pub fn pump(&mut self) {
        if self.closed {
            return;
        }

        self.drain_engine_events();
        if let Err(e) = self.reconciler.reconcile(&mut self.engine) {
            warn!(error = %e, "Failed to reconcile editor state");
        }
        self.drain_engine_events();
    }

    /// The ready delay elapsed
    pub fn ready_timer_fired(&mut self) {
        if self.closed {
            return;
        }
        self.emitter.ready_timer_fired(&self.channel);
    }

    /// Ambient color-scheme preference changed. Ignored when the page was
    /// given an explicit theme.
    pub fn color_scheme_changed(&mut self, prefers_dark: bool) {
        if self.closed {
            return;
        }
        if self.config.theme.is_some() {
            debug!("Explicit theme parameter set, ignoring color scheme change");
            return;
        }
        self.apply_theme(if prefers_dark { Theme::Dark } else { Theme::Light });
    }

    /// Release every subscription and stop all messaging
    pub fn teardown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.channel.close();
        let released = self.subscriptions.dispose_all();
        info!(released, "Editor session torn down");
    }

    pub fn subscriptions_mut(&mut self) -> &mut Subscriptions {
        &mut self.subscriptions
    }

    pub fn subscriptions(&self) -> &Subscriptions {
        &self.subscriptions
    }

    pub fn config(&self) -> &InitialConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Direct engine access for local input; call [`Session::pump`] afterwards
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn host(&self) -> &H {
        self.channel.host()
    }

    pub fn shadow(&self) -> StateShadow {
        self.reconciler.shadow()
    }

    pub fn theme(&self) -> Option<Theme> {
        self.theme
    }

    pub fn is_ready(&self) -> bool {
        self.emitter.is_ready()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn drain_engine_events(&mut self) {
        while let Some(event) = self.engine.poll_event() {
            self.reconciler.observe(event);
            self.emitter.observe(event, &self.engine, &self.channel);
        }
    }

    fn apply_theme(&mut self, theme: Theme) {
        if self.theme == Some(theme) {
            return;
        }
        self.theme = Some(theme);
        self.channel.host().set_dark_class(theme.is_dark());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryEngine, MessageSource, RecordingHost};
    use serde_json::json;

    fn mount(query: &str, host: RecordingHost) -> Session<RecordingHost, MemoryEngine> {
        Session::mount(InitialConfig::from_query(query, None), host, |options| {
            Ok(MemoryEngine::new(options))
        })
        .unwrap()
    }

    #[test]
    fn test_session_creation() {
        let host = RecordingHost::embedded();
        let session = mount("content=%3Cp%3EHi%3C%2Fp%3E&editable=false", host.clone());

        assert_eq!(session.engine().snapshot().text, "Hi");
        assert!(!session.engine().is_editable());
        assert!(!session.shadow().editable);
        assert!(!session.is_ready());
        assert!(host.posted().is_empty());
    }

    #[test]
    fn test_commands_before_ready_are_dropped() {
        let host = RecordingHost::embedded();
        let mut session = mount("", host.clone());

        session.handle_message(&MessageSource::Parent, &json!({ "type": "INSERT_TEXT", "text": "x" }));
        session.handle_message(&MessageSource::Parent, &json!({ "type": "SET_EDITABLE" }));

        assert!(session.engine().snapshot().is_empty);
        assert!(host.posted().is_empty());
    }

    #[test]
    fn test_engine_failure_to_build() {
        let result: Result<Session<RecordingHost, MemoryEngine>, _> = Session::mount(
            InitialConfig::default(),
            RecordingHost::embedded(),
            |_| Err(EngineError::new("no document root")),
        );
        assert!(matches!(result, Err(EditorError::Engine(_))));
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let host = RecordingHost::embedded();
        let mut session = mount("", host.clone());
        let disposed = std::rc::Rc::new(std::cell::Cell::new(0));

        let counter = disposed.clone();
        session
            .subscriptions_mut()
            .add("message", move || counter.set(counter.get() + 1));

        session.teardown();
        session.teardown();
        assert_eq!(disposed.get(), 1);
        assert!(session.is_closed());

        session.ready_timer_fired();
        assert!(host.posted().is_empty());
    }

    #[test]
    fn test_theme_applied_once() {
        let host = RecordingHost::embedded().with_prefers_dark(true);
        let mut session = mount("", host.clone());

        assert_eq!(session.theme(), Some(Theme::Dark));
        assert_eq!(host.theme_writes(), 1);

        session.color_scheme_changed(true);
        assert_eq!(host.theme_writes(), 1);

        session.color_scheme_changed(false);
        assert_eq!(host.dark_class(), Some(false));
        assert_eq!(host.theme_writes(), 2);
    }
}
