//! Browser transports for a control surface running inside a plugin WebView
//!
//! Each transport probes the global object for its host hook. The inbound
//! direction is a global function the host calls with a `{type, value}`
//! object (or its JSON text).

use js_sys::{Function, Reflect};
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::bridge::HostBridge;
use crate::error::{PlatformError, Result};
use crate::message::{HostUpdate, InboundMessage, OutboundMessage};
use crate::transport::{Transport, TransportKind};

/// Name of the global function the host calls with updates
pub const RECEIVE_HOOK: &str = "receiveMessageFromJUCE";

/// A method reachable from `window` through a property path
pub struct JsHookTransport {
    kind: TransportKind,
    path: &'static [&'static str],
    method: &'static str,
    /// Leading argument passed before the message (event name)
    event: Option<&'static str>,
}

impl JsHookTransport {
    /// `window.__JUCE__.backend.emitEvent('message', msg)`
    pub fn native_backend() -> Self {
        Self {
            kind: TransportKind::NativeBackend,
            path: &["__JUCE__", "backend"],
            method: "emitEvent",
            event: Some("message"),
        }
    }

    /// `window.chrome.webview.postMessage(msg)`
    pub fn webview2() -> Self {
        Self {
            kind: TransportKind::WebView2,
            path: &["chrome", "webview"],
            method: "postMessage",
            event: None,
        }
    }

    /// `window.webkit.messageHandlers.juce.postMessage(msg)`
    pub fn webkit() -> Self {
        Self {
            kind: TransportKind::WebKit,
            path: &["webkit", "messageHandlers", "juce"],
            method: "postMessage",
            event: None,
        }
    }

    fn resolve(&self) -> Option<(JsValue, Function)> {
        let window = web_sys::window()?;
        let mut target: JsValue = window.into();
        for key in self.path {
            target = Reflect::get(&target, &JsValue::from_str(key)).ok()?;
            if target.is_undefined() || target.is_null() {
                return None;
            }
        }
        let method = Reflect::get(&target, &JsValue::from_str(self.method))
            .ok()?
            .dyn_into::<Function>()
            .ok()?;
        Some((target, method))
    }
}

impl Transport for JsHookTransport {
    fn kind(&self) -> TransportKind {
        self.kind
    }

    fn is_available(&self) -> bool {
        self.resolve().is_some()
    }

    fn post(&self, message: &OutboundMessage) -> Result<()> {
        let (target, method) = self
            .resolve()
            .ok_or_else(|| PlatformError::Unavailable(self.kind.name().to_string()))?;
        let payload = serde_wasm_bindgen::to_value(message)
            .map_err(|e| PlatformError::MessageFailed(e.to_string()))?;

        let result = match self.event {
            Some(event) => method.call2(&target, &JsValue::from_str(event), &payload),
            None => method.call1(&target, &payload),
        };
        result
            .map(|_| ())
            .map_err(|e| PlatformError::MessageFailed(format!("{e:?}")))
    }
}

/// All browser transports, in priority order
pub fn browser_transports() -> Vec<Box<dyn Transport>> {
    vec![
        Box::new(JsHookTransport::native_backend()),
        Box::new(JsHookTransport::webview2()),
        Box::new(JsHookTransport::webkit()),
    ]
}

/// Bridge over the best transport the page currently offers
pub fn connect() -> HostBridge {
    HostBridge::resolve(browser_transports())
}

fn decode(message: JsValue) -> Result<InboundMessage> {
    if let Some(text) = message.as_string() {
        return InboundMessage::parse(&text);
    }
    serde_wasm_bindgen::from_value(message).map_err(|e| PlatformError::MessageFailed(e.to_string()))
}

/// Install the global inbound hook, forwarding every recognized update
pub fn install_receiver(mut handler: impl FnMut(HostUpdate) + 'static) -> Result<()> {
    let window = web_sys::window().ok_or_else(|| PlatformError::Unavailable("window".to_string()))?;

    let closure = Closure::<dyn FnMut(JsValue)>::new(move |message: JsValue| {
        let message = match decode(message) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "ignoring malformed host message");
                return;
            }
        };
        let kind = message.kind.clone();
        match message.into_update() {
            Some(update) => handler(update),
            None => debug!(%kind, "ignoring host message"),
        }
    });

    Reflect::set(
        window.as_ref(),
        &JsValue::from_str(RECEIVE_HOOK),
        closure.as_ref(),
    )
    .map_err(|e| PlatformError::MessageFailed(format!("{e:?}")))?;

    // The hook lives for the page's lifetime
    closure.forget();
    Ok(())
}
