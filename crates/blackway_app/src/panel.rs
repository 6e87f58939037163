//! Synth control panel
//!
//! Wires toolkit widgets to host parameters. Widget callbacks only queue
//! changes; the panel drains the queue to the [`HostBridge`] after every
//! operation, so callbacks never touch the toolkit while it is borrowed.
//!
//! Binding rules:
//! - knobs and sliders send `{type: param, value}` on every change
//! - a binary control bound to `playNote` sends `playNote` when switched on
//!   and `stopNote` when switched off
//! - a binary control bound to `stopNote` sends `stopNote` and springs back
//! - other binary bindings send `1` or `0`
//! - note changes are mirrored, without notification, into every stateful
//!   widget bound to `playNote` (LEDs, the play button itself)
//! - readouts follow both user changes and host updates

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use blackway_core::{ElementId, ElementTag, Event};
use blackway_platform::{BridgeStats, HostBridge, HostUpdate, OutboundMessage, ParamKind};
use blackway_widgets::{ChangeCallback, Toolkit, WidgetKind};
use tracing::{debug, info, warn};

use crate::config::{PanelConfig, ReadoutConfig, WidgetOptions};

/// Change queued by a widget callback
#[derive(Clone, Debug, PartialEq)]
enum PanelEvent {
    Value {
        param: Option<ParamKind>,
        readout: Option<usize>,
        value: f64,
    },
    Flag {
        param: ParamKind,
        state: bool,
    },
}

type Outbox = Rc<RefCell<Vec<PanelEvent>>>;

fn value_sink(
    outbox: &Outbox,
    param: Option<ParamKind>,
    readout: Option<usize>,
) -> Option<ChangeCallback<f64>> {
    if param.is_none() && readout.is_none() {
        return None;
    }
    let outbox = Rc::clone(outbox);
    Some(Box::new(move |value| {
        outbox.borrow_mut().push(PanelEvent::Value {
            param,
            readout,
            value,
        })
    }))
}

fn flag_sink(outbox: &Outbox, param: ParamKind) -> ChangeCallback<bool> {
    let outbox = Rc::clone(outbox);
    Box::new(move |state| outbox.borrow_mut().push(PanelEvent::Flag { param, state }))
}

/// Value display owned by a continuous widget
struct Readout {
    widget: String,
    element: ElementId,
    format: ReadoutConfig,
}

/// Create the readout element at the end of `container`, showing the
/// widget's initial value
fn attach_readout(
    toolkit: &mut Toolkit,
    container: &str,
    widget: &str,
    format: &ReadoutConfig,
) -> Result<ElementId> {
    let text = toolkit.value_of(widget).map(|value| format.format(value));
    let document = toolkit.document_mut();
    let Some(parent) = document.get_element_by_id(container) else {
        bail!("container `{container}` not found");
    };

    let element = document.create_element(ElementTag::Div);
    if !document.set_dom_id(element, &format.id) {
        document.remove(element);
        bail!("DOM id `{}` is already in use", format.id);
    }
    if let Some(el) = document.element_mut(element) {
        el.class = Some("value-display".to_string());
        el.text = text;
    }
    document.append_child(parent, element);
    Ok(element)
}

/// A toolkit bound to a host bridge
pub struct SynthPanel {
    toolkit: Toolkit,
    bridge: HostBridge,
    outbox: Outbox,
    bindings: HashMap<ParamKind, Vec<String>>,
    /// Indexed by the slot captured in each widget's callback
    readouts: Vec<Option<Readout>>,
    events_dispatched: u64,
}

impl SynthPanel {
    /// Create containers and controls from `config`
    pub fn build(config: PanelConfig, bridge: HostBridge) -> Result<Self> {
        config.validate()?;

        let mut toolkit = Toolkit::new(config.toolkit);
        for container in &config.containers {
            if toolkit.document_mut().create_container(container).is_none() {
                bail!("container `{container}` already exists");
            }
        }

        let outbox: Outbox = Rc::default();
        let mut bindings: HashMap<ParamKind, Vec<String>> = HashMap::new();
        let mut readouts = Vec::new();

        for (index, control) in config.controls.into_iter().enumerate() {
            let param = control.param;
            let container = control.container.as_str();
            let slot = control.readout.as_ref().map(|_| readouts.len());
            let created = match control.widget {
                WidgetOptions::Knob(mut cfg) => {
                    cfg.on_change = value_sink(&outbox, param, slot);
                    toolkit.create_knob(container, cfg)
                }
                WidgetOptions::Slider(mut cfg) => {
                    cfg.on_change = value_sink(&outbox, param, slot);
                    toolkit.create_slider(container, cfg)
                }
                WidgetOptions::ToggleButton(mut cfg) => {
                    cfg.on_change = param.map(|p| flag_sink(&outbox, p));
                    toolkit.create_toggle_button(container, cfg)
                }
                WidgetOptions::Switch(mut cfg) => {
                    cfg.on_change = param.map(|p| flag_sink(&outbox, p));
                    toolkit.create_switch(container, cfg)
                }
                WidgetOptions::Led(cfg) => toolkit.create_led(container, cfg),
            };
            let id = created.with_context(|| format!("control #{index} in `{container}`"))?;

            if let Some(format) = control.readout {
                let element = attach_readout(&mut toolkit, container, &id, &format)
                    .with_context(|| format!("readout of `{id}`"))?;
                readouts.push(Some(Readout {
                    widget: id.clone(),
                    element,
                    format,
                }));
            }

            if let Some(p) = param {
                debug!(%id, param = %p, "control bound");
                bindings.entry(p).or_default().push(id);
            }
        }

        info!(widgets = toolkit.len(), "panel built");
        Ok(Self {
            toolkit,
            bridge,
            outbox,
            bindings,
            readouts,
            events_dispatched: 0,
        })
    }

    pub fn toolkit(&self) -> &Toolkit {
        &self.toolkit
    }

    /// Direct toolkit access; call [`flush`](Self::flush) after changing
    /// values through it
    pub fn toolkit_mut(&mut self) -> &mut Toolkit {
        &mut self.toolkit
    }

    pub fn bridge(&self) -> &HostBridge {
        &self.bridge
    }

    pub fn stats(&self) -> BridgeStats {
        self.bridge.stats()
    }

    pub fn events_dispatched(&self) -> u64 {
        self.events_dispatched
    }

    /// Widget ids bound to `param`, in creation order
    pub fn bound(&self, param: ParamKind) -> &[String] {
        self.bindings.get(&param).map(Vec::as_slice).unwrap_or(&[])
    }

    // ========================================================================
    // User input
    // ========================================================================

    /// Route an input event, then deliver the changes it caused
    pub fn dispatch(&mut self, event: &Event) -> bool {
        self.events_dispatched += 1;
        let handled = self.toolkit.dispatch(event);
        self.flush();
        handled
    }

    /// Set a continuous widget's value as if the user had moved it
    pub fn set_value(&mut self, id: &str, value: f64) -> bool {
        let Some(mut widget) = self.toolkit.continuous(id) else {
            return false;
        };
        widget.set_value(value);
        self.flush();
        true
    }

    /// Flip a binary control as if it had been clicked
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let state = match self.toolkit.kind_of(id)? {
            WidgetKind::ToggleButton => self.toolkit.toggle_button(id)?.toggle(),
            WidgetKind::Switch => self.toolkit.switch(id)?.toggle(),
            _ => return None,
        };
        self.flush();
        Some(self.toolkit.state_of(id).unwrap_or(state))
    }

    /// Send a choice parameter such as the waveform
    pub fn send_choice(&self, param: ParamKind, choice: &str) -> Result<()> {
        if !param.is_choice() {
            bail!("`{param}` is not a choice parameter");
        }
        self.bridge.send(&OutboundMessage::text(param, choice));
        Ok(())
    }

    /// Remove a widget, its readout and its bindings
    pub fn destroy(&mut self, id: &str) -> bool {
        if !self.toolkit.destroy(id) {
            return false;
        }
        for ids in self.bindings.values_mut() {
            ids.retain(|bound| bound != id);
        }
        for slot in &mut self.readouts {
            if slot.as_ref().is_some_and(|r| r.widget == id) {
                if let Some(readout) = slot.take() {
                    self.toolkit.document_mut().remove(readout.element);
                }
            }
        }
        true
    }

    /// Deliver queued widget changes to the host; returns how many were
    /// processed
    pub fn flush(&mut self) -> usize {
        let events = std::mem::take(&mut *self.outbox.borrow_mut());
        for event in &events {
            match event {
                PanelEvent::Value {
                    param,
                    readout,
                    value,
                } => {
                    if let Some(slot) = readout {
                        self.show_value(*slot, *value);
                    }
                    if let Some(param) = param {
                        self.bridge.send(&OutboundMessage::number(*param, *value));
                    }
                }
                PanelEvent::Flag {
                    param: ParamKind::PlayNote,
                    state,
                } => {
                    let message = if *state {
                        OutboundMessage::play_note()
                    } else {
                        OutboundMessage::stop_note()
                    };
                    self.bridge.send(&message);
                    self.mirror_note(*state);
                }
                PanelEvent::Flag {
                    param: ParamKind::StopNote,
                    state,
                } => {
                    if !*state {
                        continue;
                    }
                    self.bridge.send(&OutboundMessage::stop_note());
                    self.mirror_note(false);
                    self.set_bound_states(ParamKind::StopNote, false);
                }
                PanelEvent::Flag { param, state } => {
                    let value = if *state { 1.0 } else { 0.0 };
                    self.bridge.send(&OutboundMessage::number(*param, value));
                }
            }
        }
        events.len()
    }

    fn show_value(&mut self, slot: usize, value: f64) {
        let Some(Some(readout)) = self.readouts.get(slot) else {
            return;
        };
        if let Some(el) = self.toolkit.document_mut().element_mut(readout.element) {
            el.text = Some(readout.format.format(value));
        }
    }

    /// Redraw the readouts of `widget` from its current value
    fn refresh_readouts(&mut self, widget: &str) {
        let Some(value) = self.toolkit.value_of(widget) else {
            return;
        };
        for readout in self.readouts.iter().flatten() {
            if readout.widget != widget {
                continue;
            }
            if let Some(el) = self.toolkit.document_mut().element_mut(readout.element) {
                el.text = Some(readout.format.format(value));
            }
        }
    }

    fn mirror_note(&mut self, playing: bool) {
        self.set_bound_states(ParamKind::PlayNote, playing);
    }

    fn set_bound_states(&mut self, param: ParamKind, state: bool) {
        let ids = self.bound(param).to_vec();
        for id in ids {
            if let Some(mut widget) = self.toolkit.stateful(&id) {
                widget.set_state(state);
            }
        }
    }

    // ========================================================================
    // Host updates
    // ========================================================================

    /// Apply a raw host message; returns how many widgets were synced
    pub fn apply_host_message(&mut self, raw: &str) -> usize {
        match self.bridge.receive(raw) {
            Some(update) => self.apply_update(&update),
            None => 0,
        }
    }

    /// Move bound widgets to the host's value without echoing it back
    pub fn apply_update(&mut self, update: &HostUpdate) -> usize {
        let ids = self.bound(update.param).to_vec();
        let mut synced = 0;

        for id in &ids {
            if let Some(mut widget) = self.toolkit.continuous(id) {
                match update.value.as_f64() {
                    Some(value) => {
                        widget.sync_value(value);
                        synced += 1;
                    }
                    None => warn!(%id, value = ?update.value, "non-numeric update ignored"),
                }
            } else if let Some(mut widget) = self.toolkit.stateful(id) {
                match update.value.as_bool() {
                    Some(state) => {
                        widget.set_state(state);
                        synced += 1;
                    }
                    None => warn!(%id, value = ?update.value, "non-flag update ignored"),
                }
            }
            self.refresh_readouts(id);
        }

        if synced == 0 {
            debug!(param = %update.param, "no widget bound to host update");
        }
        synced
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Text of the connected element with this DOM id
    pub fn text_of(&self, dom_id: &str) -> Option<&str> {
        let document = self.toolkit.document();
        let id = document.get_element_by_id(dom_id)?;
        document.element(id)?.text.as_deref()
    }

    /// Indented listing of the document with each element's inline style
    pub fn render_tree(&self) -> String {
        let document = self.toolkit.document();
        let mut out = String::new();

        for (depth, id) in document.walk(document.body()) {
            let Some(element) = document.element(id) else {
                continue;
            };
            let _ = write!(out, "{:indent$}<{}", "", element.tag.as_str(), indent = depth * 2);
            if let Some(dom_id) = element.dom_id() {
                let _ = write!(out, " id=\"{dom_id}\"");
            }
            if let Some(class) = &element.class {
                let _ = write!(out, " class=\"{class}\"");
            }
            let css = element.style.to_css();
            if !css.is_empty() {
                let _ = write!(out, " style=\"{css}\"");
            }
            out.push('>');
            if let Some(text) = &element.text {
                out.push_str(text);
            }
            out.push('\n');
        }
        out
    }
}
