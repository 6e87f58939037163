//! Host bridge
//!
//! The bridge resolves its transport once, when it is created: the first
//! available candidate in [`TransportKind`] priority order wins. Without one
//! every message is logged and dropped; sending never fails.

use std::cell::Cell;

use tracing::{debug, info, warn};

use crate::message::{HostUpdate, InboundMessage, OutboundMessage};
use crate::transport::{Transport, TransportKind};

/// Delivery counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BridgeStats {
    pub sent: u64,
    pub dropped: u64,
}

/// Fire-and-forget channel to the audio host
pub struct HostBridge {
    transport: Option<Box<dyn Transport>>,
    sent: Cell<u64>,
    dropped: Cell<u64>,
}

impl HostBridge {
    /// Pick the highest-priority available transport among `candidates`
    pub fn resolve(candidates: Vec<Box<dyn Transport>>) -> Self {
        let mut available: Vec<Box<dyn Transport>> =
            candidates.into_iter().filter(|t| t.is_available()).collect();
        available.sort_by_key(|t| t.kind());
        let transport = available.into_iter().next();

        match &transport {
            Some(t) => info!(transport = t.kind().name(), "host bridge connected"),
            None => warn!("no host transport available; messages will be dropped"),
        }

        Self {
            transport,
            sent: Cell::new(0),
            dropped: Cell::new(0),
        }
    }

    /// Bridge over a single transport
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::resolve(vec![Box::new(transport)])
    }

    /// Bridge that drops everything
    pub fn disconnected() -> Self {
        Self::resolve(Vec::new())
    }

    /// Kind of the resolved transport
    pub fn transport_kind(&self) -> Option<TransportKind> {
        self.transport.as_ref().map(|t| t.kind())
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Send a message; failures are logged and counted as dropped
    pub fn send(&self, message: &OutboundMessage) {
        let Some(transport) = &self.transport else {
            warn!(kind = %message.kind, "host message handler not available");
            self.dropped.set(self.dropped.get() + 1);
            return;
        };

        match transport.post(message) {
            Ok(()) => {
                debug!(kind = %message.kind, value = ?message.value, "message sent");
                self.sent.set(self.sent.get() + 1);
            }
            Err(e) => {
                warn!(kind = %message.kind, error = %e, "message dropped");
                self.dropped.set(self.dropped.get() + 1);
            }
        }
    }

    /// Decode an inbound JSON message into a parameter update.
    ///
    /// Malformed JSON is reported as a warning; unknown types and updates
    /// without a value are ignored.
    pub fn receive(&self, raw: &str) -> Option<HostUpdate> {
        let message = match InboundMessage::parse(raw) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "ignoring malformed host message");
                return None;
            }
        };
        self.accept(message)
    }

    /// Interpret an already-decoded inbound message
    pub fn accept(&self, message: InboundMessage) -> Option<HostUpdate> {
        let kind = message.kind.clone();
        let update = message.into_update();
        if update.is_none() {
            debug!(%kind, "ignoring host message");
        }
        update
    }

    pub fn stats(&self) -> BridgeStats {
        BridgeStats {
            sent: self.sent.get(),
            dropped: self.dropped.get(),
        }
    }
}
