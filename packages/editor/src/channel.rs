//! # Message Channel
//!
//! Origin-validated wrapper around the host's cross-window messaging.
//!
//! - Outbound: posted to the parent unconditionally, best effort.
//! - Inbound: only the parent window is heard. Anything else is dropped
//!   without a trace.

use crate::{DecodeError, HostWindow, InboundCommand, OutboundEvent};
use serde_json::Value;
use tracing::{debug, warn};

pub struct MessageChannel<H: HostWindow> {
    host: H,
    open: bool,
}

impl<H: HostWindow> MessageChannel<H> {
    pub fn new(host: H) -> Self {
        Self { host, open: true }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Stop sending and receiving for good
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Post an event to the parent. Failures are logged, never returned.
    pub fn send(&self, event: &OutboundEvent) {
        if !self.open {
            return;
        }

        let message = match event.to_message() {
            Ok(message) => message,
            Err(e) => {
                warn!(kind = event.kind(), error = %e, "Failed to serialize outbound event");
                return;
            }
        };

        match self.host.post_to_parent(&message) {
            Ok(()) => debug!(kind = event.kind(), "Sent event to parent"),
            Err(e) => debug!(kind = event.kind(), error = %e, "Event not delivered"),
        }
    }

    /// Validate and decode an inbound message.
    ///
    /// Returns `None` for anything that must be dropped locally: a closed
    /// channel, a sender other than the parent, a missing or unknown `type`.
    /// A known `type` with a broken payload comes back as `Some(Err(..))` so
    /// the caller can report it.
    pub fn receive(
        &self,
        source: &H::Source,
        data: &Value,
    ) -> Option<Result<InboundCommand, DecodeError>> {
        if !self.open || !self.host.is_parent(source) {
            return None;
        }

        match InboundCommand::decode(data) {
            Ok(command) => Some(Ok(command)),
            Err(DecodeError::MissingType) => {
                debug!("Dropping message without a type");
                None
            }
            Err(DecodeError::UnknownType(kind)) => {
                warn!(kind = %kind, "Unknown message");
                None
            }
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MessageSource, RecordingHost};
    use serde_json::json;

    #[test]
    fn test_send_posts_tagged_message() {
        let host = RecordingHost::embedded();
        let channel = MessageChannel::new(host.clone());

        channel.send(&OutboundEvent::Focused);
        assert_eq!(host.posted(), vec![json!({ "type": "EDITOR_FOCUS" })]);
    }

    #[test]
    fn test_send_without_parent_is_silent() {
        let host = RecordingHost::standalone();
        let channel = MessageChannel::new(host.clone());

        channel.send(&OutboundEvent::Ready);
        assert!(host.posted().is_empty());
    }

    #[test]
    fn test_receive_filters_by_origin() {
        let channel = MessageChannel::new(RecordingHost::embedded());
        let data = json!({ "type": "FOCUS" });

        assert!(matches!(
            channel.receive(&MessageSource::Parent, &data),
            Some(Ok(InboundCommand::Focus))
        ));
        assert!(channel.receive(&MessageSource::Window, &data).is_none());
        assert!(channel.receive(&MessageSource::Other, &data).is_none());
    }

    #[test]
    fn test_receive_drops_untyped_and_unknown() {
        let channel = MessageChannel::new(RecordingHost::embedded());

        assert!(channel.receive(&MessageSource::Parent, &json!({ "text": "x" })).is_none());
        assert!(channel
            .receive(&MessageSource::Parent, &json!({ "type": "UNKNOWN_CMD" }))
            .is_none());
    }

    #[test]
    fn test_receive_surfaces_malformed_payloads() {
        let channel = MessageChannel::new(RecordingHost::embedded());

        let received = channel.receive(&MessageSource::Parent, &json!({ "type": "SET_EDITABLE" }));
        assert!(matches!(received, Some(Err(DecodeError::Malformed { .. }))));
    }

    #[test]
    fn test_closed_channel_is_inert() {
        let host = RecordingHost::embedded();
        let mut channel = MessageChannel::new(host.clone());
        channel.close();

        channel.send(&OutboundEvent::Ready);
        assert!(host.posted().is_empty());
        assert!(channel
            .receive(&MessageSource::Parent, &json!({ "type": "FOCUS" }))
            .is_none());
    }
}
