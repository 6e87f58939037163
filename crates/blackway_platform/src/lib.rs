//! Blackway Platform
//!
//! The host bridge between a Blackway control surface and the audio host
//! that embeds it:
//!
//! - **Messages**: the `{type, value}` vocabulary in both directions
//! - **Transports**: host delivery mechanisms, resolved once by priority
//! - **Bridge**: fire-and-forget sending with delivery counters
//!
//! Browser transports are available with the `web` feature.
//!
//! ```
//! use blackway_platform::{HostBridge, OutboundMessage, ParamKind, RecordingTransport};
//!
//! let recorder = RecordingTransport::new();
//! let bridge = HostBridge::new(recorder.clone());
//! bridge.send(&OutboundMessage::number(ParamKind::Cutoff, 1200.0));
//! assert_eq!(recorder.len(), 1);
//! ```

pub mod bridge;
pub mod error;
pub mod message;
pub mod transport;
#[cfg(feature = "web")]
pub mod web;

pub use bridge::{BridgeStats, HostBridge};
pub use error::{PlatformError, Result};
pub use message::{HostUpdate, InboundMessage, MessageValue, OutboundMessage, ParamKind};
pub use transport::{CallbackTransport, RecordingTransport, Transport, TransportKind};
