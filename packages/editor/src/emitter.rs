//! # Event Emitter
//!
//! Turns engine events into outbound messages.
//!
//! `EDITOR_READY` goes out exactly once, when the engine has been created
//! and the ready delay has elapsed. Anything that has to be sent before that
//! point flushes the ready announcement first, so the parent always sees
//! `EDITOR_READY` before any other event.

use crate::{EditorEngine, EngineEvent, HostWindow, MessageChannel, OutboundEvent};
use tracing::info;

#[derive(Debug, Default)]
pub struct EventEmitter {
    engine_created: bool,
    timer_fired: bool,
    ready: bool,
    reported_focus: bool,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `EDITOR_READY` has been sent
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// The ready delay elapsed
    pub fn ready_timer_fired<H: HostWindow>(&mut self, channel: &MessageChannel<H>) {
        self.timer_fired = true;
        if self.engine_created {
            self.announce_ready(channel);
        }
    }

    /// Translate one engine event
    pub fn observe<H: HostWindow, E: EditorEngine>(
        &mut self,
        event: EngineEvent,
        engine: &E,
        channel: &MessageChannel<H>,
    ) {
        match event {
            EngineEvent::Created => {
                self.engine_created = true;
                if self.timer_fired {
                    self.announce_ready(channel);
                }
            }

            EngineEvent::Updated => {
                self.emit(channel, OutboundEvent::content_changed(engine.snapshot()));
            }

            EngineEvent::Focused => {
                if !self.reported_focus {
                    self.reported_focus = true;
                    self.emit(channel, OutboundEvent::Focused);
                }
            }

            EngineEvent::Blurred => {
                if self.reported_focus {
                    self.reported_focus = false;
                    self.emit(channel, OutboundEvent::Blurred);
                }
            }
        }
    }

    /// Send an event, announcing readiness first if needed
    pub fn emit<H: HostWindow>(&mut self, channel: &MessageChannel<H>, event: OutboundEvent) {
        self.announce_ready(channel);
        channel.send(&event);
    }

    fn announce_ready<H: HostWindow>(&mut self, channel: &MessageChannel<H>) {
        if self.ready {
            return;
        }
        self.ready = true;
        info!("Editor ready");
        channel.send(&OutboundEvent::Ready);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EngineOptions, MemoryEngine, RecordingHost};

    fn fixture() -> (RecordingHost, MessageChannel<RecordingHost>, MemoryEngine) {
        let host = RecordingHost::embedded();
        let channel = MessageChannel::new(host.clone());
        let engine = MemoryEngine::new(&EngineOptions {
            content: "<p>Hi</p>".to_string(),
            editable: true,
            placeholder: String::new(),
            show_toolbar: true,
            theme: crate::Theme::Light,
        });
        (host, channel, engine)
    }

    #[test]
    fn test_ready_waits_for_timer_and_engine() {
        let (host, channel, engine) = fixture();
        let mut emitter = EventEmitter::new();

        emitter.observe(EngineEvent::Created, &engine, &channel);
        assert!(host.posted().is_empty());
        assert!(!emitter.is_ready());

        emitter.ready_timer_fired(&channel);
        assert_eq!(host.posted_types(), vec!["EDITOR_READY"]);

        emitter.ready_timer_fired(&channel);
        assert_eq!(host.posted_types(), vec!["EDITOR_READY"]);
    }

    #[test]
    fn test_timer_before_engine() {
        let (host, channel, engine) = fixture();
        let mut emitter = EventEmitter::new();

        emitter.ready_timer_fired(&channel);
        assert!(host.posted().is_empty());

        emitter.observe(EngineEvent::Created, &engine, &channel);
        assert_eq!(host.posted_types(), vec!["EDITOR_READY"]);
    }

    #[test]
    fn test_early_event_flushes_ready() {
        let (host, channel, engine) = fixture();
        let mut emitter = EventEmitter::new();

        emitter.observe(EngineEvent::Created, &engine, &channel);
        emitter.observe(EngineEvent::Updated, &engine, &channel);
        emitter.ready_timer_fired(&channel);

        assert_eq!(host.posted_types(), vec!["EDITOR_READY", "CONTENT_CHANGE"]);
        assert_eq!(host.posted()[1]["text"], "Hi");
    }

    #[test]
    fn test_focus_transitions_are_deduplicated() {
        let (host, channel, engine) = fixture();
        let mut emitter = EventEmitter::new();
        emitter.observe(EngineEvent::Created, &engine, &channel);
        emitter.ready_timer_fired(&channel);

        emitter.observe(EngineEvent::Blurred, &engine, &channel);
        emitter.observe(EngineEvent::Focused, &engine, &channel);
        emitter.observe(EngineEvent::Focused, &engine, &channel);
        emitter.observe(EngineEvent::Blurred, &engine, &channel);
        emitter.observe(EngineEvent::Blurred, &engine, &channel);

        assert_eq!(
            host.posted_types(),
            vec!["EDITOR_READY", "EDITOR_FOCUS", "EDITOR_BLUR"]
        );
    }
}
