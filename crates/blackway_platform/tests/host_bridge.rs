//! Bridge behaviour seen from an embedding host

use std::cell::RefCell;
use std::rc::Rc;

use blackway_platform::{
    CallbackTransport, HostBridge, MessageValue, OutboundMessage, ParamKind, RecordingTransport,
    Transport, TransportKind,
};

#[test]
fn host_receives_json_objects_in_call_order() {
    let wire = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&wire);
    let bridge = HostBridge::new(
        CallbackTransport::new(move |m| {
            sink.borrow_mut().push(m.to_json()?);
            Ok(())
        })
        .with_kind(TransportKind::NativeBackend),
    );

    bridge.send(&OutboundMessage::number(ParamKind::Volume, 0.8));
    bridge.send(&OutboundMessage::text(ParamKind::Waveform, "saw"));
    bridge.send(&OutboundMessage::play_note());

    assert_eq!(
        *wire.borrow(),
        vec![
            r#"{"type":"volume","value":0.8}"#,
            r#"{"type":"waveform","value":"saw"}"#,
            r#"{"type":"playNote"}"#,
        ]
    );
    assert_eq!(bridge.transport_kind(), Some(TransportKind::NativeBackend));
}

#[test]
fn transport_is_resolved_once() {
    struct Flaky {
        up: Rc<RefCell<bool>>,
        log: RecordingTransport,
    }

    impl Transport for Flaky {
        fn kind(&self) -> TransportKind {
            TransportKind::WebView2
        }

        fn is_available(&self) -> bool {
            *self.up.borrow()
        }

        fn post(&self, message: &OutboundMessage) -> blackway_platform::Result<()> {
            self.log.post(message)
        }
    }

    let up = Rc::new(RefCell::new(false));
    let log = RecordingTransport::new();
    let bridge = HostBridge::new(Flaky {
        up: Rc::clone(&up),
        log: log.clone(),
    });

    // Becoming available later does not reconnect the bridge
    *up.borrow_mut() = true;
    bridge.send(&OutboundMessage::stop_note());
    assert!(!bridge.is_connected());
    assert!(log.is_empty());
    assert_eq!(bridge.stats().dropped, 1);
}

#[test]
fn inbound_updates_for_every_parameter() {
    let bridge = HostBridge::disconnected();
    for kind in ParamKind::ALL {
        let raw = format!(r#"{{"type":"{}","value":1}}"#, kind.update_type());
        let update = bridge.receive(&raw).unwrap();
        assert_eq!(update.param, kind);
        assert_eq!(update.value, MessageValue::Number(1.0));
    }
}
