//! Message transports to the audio host
//!
//! A [`Transport`] delivers encoded messages through one host mechanism.
//! Hosts expose at most a few of them; the [`HostBridge`](crate::HostBridge)
//! picks the best available one once, in [`TransportKind`] priority order.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Result;
use crate::message::OutboundMessage;

/// Host mechanisms, in decreasing priority
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransportKind {
    /// Native backend event emitter (`window.__JUCE__.backend.emitEvent`)
    NativeBackend,
    /// Windows WebView2 (`window.chrome.webview.postMessage`)
    WebView2,
    /// WKWebView message handler (`window.webkit.messageHandlers.juce`)
    WebKit,
    /// In-process delivery (embedding, tests)
    InProcess,
}

impl TransportKind {
    pub fn name(&self) -> &'static str {
        match self {
            TransportKind::NativeBackend => "native-backend",
            TransportKind::WebView2 => "webview2",
            TransportKind::WebKit => "webkit",
            TransportKind::InProcess => "in-process",
        }
    }
}

/// One way of delivering messages to the host
pub trait Transport {
    fn kind(&self) -> TransportKind;

    /// Whether the host hook is present right now
    fn is_available(&self) -> bool;

    /// Deliver one message
    fn post(&self, message: &OutboundMessage) -> Result<()>;
}

/// Delivers messages to a closure
pub struct CallbackTransport {
    kind: TransportKind,
    callback: Box<dyn Fn(&OutboundMessage) -> Result<()>>,
}

impl CallbackTransport {
    pub fn new(callback: impl Fn(&OutboundMessage) -> Result<()> + 'static) -> Self {
        Self {
            kind: TransportKind::InProcess,
            callback: Box::new(callback),
        }
    }

    /// Report a different kind, e.g. when wrapping a native host hook
    pub fn with_kind(mut self, kind: TransportKind) -> Self {
        self.kind = kind;
        self
    }
}

impl Transport for CallbackTransport {
    fn kind(&self) -> TransportKind {
        self.kind
    }

    fn is_available(&self) -> bool {
        true
    }

    fn post(&self, message: &OutboundMessage) -> Result<()> {
        (self.callback)(message)
    }
}

/// Records every message in a shared log
///
/// Clones share the same log, so a test can keep one handle and give the
/// other to the bridge.
#[derive(Clone, Debug, Default)]
pub struct RecordingTransport {
    log: Rc<RefCell<Vec<OutboundMessage>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all recorded messages, oldest first
    pub fn messages(&self) -> Vec<OutboundMessage> {
        self.log.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }

    /// Remove and return all recorded messages
    pub fn take(&self) -> Vec<OutboundMessage> {
        std::mem::take(&mut *self.log.borrow_mut())
    }
}

impl Transport for RecordingTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::InProcess
    }

    fn is_available(&self) -> bool {
        true
    }

    fn post(&self, message: &OutboundMessage) -> Result<()> {
        self.log.borrow_mut().push(message.clone());
        Ok(())
    }
}
