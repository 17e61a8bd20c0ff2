//! # Inkframe Editor
//!
//! Messaging protocol and state synchronization for a rich-text editor that
//! lives in an iframe and is driven by its parent page.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ config: query string → InitialConfig        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: owns engine + channel + state      │
//! │  - channel:    origin-checked messaging     │
//! │  - dispatcher: commands → engine            │
//! │  - emitter:    engine events → parent       │
//! │  - reconciler: editable/focus shadow        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ engine: external rich-text editor           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use inkframe_editor::{InitialConfig, MemoryEngine, MessageSource, RecordingHost, Session};
//!
//! let config = InitialConfig::from_query("?content=%3Cp%3EHi%3C%2Fp%3E", None);
//! let mut session = Session::mount(config, RecordingHost::embedded(), |options| {
//!     Ok(MemoryEngine::new(options))
//! })?;
//!
//! // The platform fires this READY_DELAY after registering its listeners
//! session.ready_timer_fired();
//!
//! session.handle_message(
//!     &MessageSource::Parent,
//!     &serde_json::json!({ "type": "INSERT_TEXT", "text": "hello" }),
//! );
//!
//! session.teardown();
//! ```

mod channel;
mod config;
mod dispatcher;
mod emitter;
mod engine;
mod errors;
mod host;
mod memory_engine;
mod messages;
mod reconciler;
mod session;
mod subscriptions;

pub use channel::MessageChannel;
pub use config::{Access, InitialConfig, Theme, DEFAULT_PLACEHOLDER};
pub use emitter::EventEmitter;
pub use engine::{ContentSnapshot, EditorEngine, EngineEvent, EngineOptions};
pub use errors::{ChannelError, DecodeError, EditorError, EngineError};
pub use host::{HostWindow, MessageSource, RecordingHost};
pub use memory_engine::MemoryEngine;
pub use messages::{InboundCommand, OutboundEvent};
pub use reconciler::{Reconciler, StateShadow};
pub use session::{Session, ACCESS_DENIED_MESSAGE, READY_DELAY};
pub use subscriptions::Subscriptions;
