//! Widget registry and event routing
//!
//! The [`Toolkit`] owns the visual tree and every widget created in it.
//! Widgets are addressed by string id; factories validate their configuration
//! before anything is attached, so a failed creation leaves no trace.
//!
//! Presses and clicks are delivered to the widget whose hit element contains
//! the event target. A widget that starts an interaction on press captures
//! the pointer: moves and releases are then delivered to capturing widgets
//! only, and a release ends every capture.

use blackway_core::{Document, ElementId, Event, GesturePhase, DEFAULT_FRAME_COUNT};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use slotmap::SlotMap;
use smallvec::SmallVec;
use tracing::{debug, error, trace};

use crate::error::{Result, WidgetError};
use crate::knob::{Knob, KnobConfig};
use crate::led::{Led, LedConfig};
use crate::slider::{Slider, SliderConfig};
use crate::toggle::{Switch, SwitchConfig, ToggleButton, ToggleButtonConfig};
use crate::widget::{
    Capture, ContinuousWidget, StatefulWidget, Widget, WidgetKey, WidgetKind, WidgetMut,
};

/// Asset locations and filmstrip layout shared by all widgets
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolkitConfig {
    /// Directory holding button, switch and LED images
    pub asset_root: String,
    /// Filmstrip directory, relative to `asset_root`
    pub filmstrip_dir: String,
    /// Frames per filmstrip
    pub frame_count: u32,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            asset_root: "Assets".to_string(),
            filmstrip_dir: "PNG Filmstripes 128 frames".to_string(),
            frame_count: DEFAULT_FRAME_COUNT,
        }
    }
}

impl ToolkitConfig {
    /// Path of a plain image asset
    pub fn image_path(&self, file: &str) -> String {
        join_path(&[&self.asset_root, file])
    }

    /// Path of a filmstrip asset
    pub fn filmstrip_path(&self, file: &str) -> String {
        join_path(&[&self.asset_root, &self.filmstrip_dir, file])
    }
}

fn join_path(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim_matches('/'))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Registry of live widgets
pub struct Toolkit {
    config: ToolkitConfig,
    document: Document,
    widgets: SlotMap<WidgetKey, Box<dyn Widget>>,
    by_id: FxHashMap<String, WidgetKey>,
    by_target: FxHashMap<ElementId, WidgetKey>,
    captured: SmallVec<[WidgetKey; 2]>,
    serial: u64,
}

impl Default for Toolkit {
    fn default() -> Self {
        Self::new(ToolkitConfig::default())
    }
}

impl Toolkit {
    /// Create an empty toolkit with its own document
    pub fn new(config: ToolkitConfig) -> Self {
        Self::with_document(config, Document::new())
    }

    /// Create an empty toolkit rendering into an existing document
    pub fn with_document(config: ToolkitConfig, document: Document) -> Self {
        Self {
            config,
            document,
            widgets: SlotMap::with_key(),
            by_id: FxHashMap::default(),
            by_target: FxHashMap::default(),
            captured: SmallVec::new(),
            serial: 0,
        }
    }

    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    // ========================================================================
    // Factories
    // ========================================================================

    /// Create a knob under the container with DOM id `container`
    pub fn create_knob(&mut self, container: &str, config: KnobConfig) -> Result<String> {
        let parent = self.container(container, WidgetKind::Knob)?;
        let id = self.claim_id(config.id.as_deref(), WidgetKind::Knob)?;
        let knob = Knob::build(&mut self.document, parent, id, config, &self.config)
            .map_err(|e| {
                error!(%e, "failed to create knob");
                e
            })?;
        Ok(self.register(Box::new(knob)))
    }

    /// Create a slider under the container with DOM id `container`
    pub fn create_slider(&mut self, container: &str, config: SliderConfig) -> Result<String> {
        let parent = self.container(container, WidgetKind::Slider)?;
        let id = self.claim_id(config.id.as_deref(), WidgetKind::Slider)?;
        let slider = Slider::build(&mut self.document, parent, id, config, &self.config)
            .map_err(|e| {
                error!(%e, "failed to create slider");
                e
            })?;
        Ok(self.register(Box::new(slider)))
    }

    /// Create a toggle button under the container with DOM id `container`
    pub fn create_toggle_button(
        &mut self,
        container: &str,
        config: ToggleButtonConfig,
    ) -> Result<String> {
        let parent = self.container(container, WidgetKind::ToggleButton)?;
        let id = self.claim_id(config.id.as_deref(), WidgetKind::ToggleButton)?;
        let button = ToggleButton::build(&mut self.document, parent, id, config, &self.config);
        Ok(self.register(Box::new(button)))
    }

    /// Create a switch under the container with DOM id `container`
    pub fn create_switch(&mut self, container: &str, config: SwitchConfig) -> Result<String> {
        let parent = self.container(container, WidgetKind::Switch)?;
        let id = self.claim_id(config.id.as_deref(), WidgetKind::Switch)?;
        let switch = Switch::build(&mut self.document, parent, id, config, &self.config);
        Ok(self.register(Box::new(switch)))
    }

    /// Create an LED under the container with DOM id `container`
    pub fn create_led(&mut self, container: &str, config: LedConfig) -> Result<String> {
        let parent = self.container(container, WidgetKind::Led)?;
        let id = self.claim_id(config.id.as_deref(), WidgetKind::Led)?;
        let led = Led::build(&mut self.document, parent, id, config, &self.config)
            .map_err(|e| {
                error!(%e, "failed to create led");
                e
            })?;
        Ok(self.register(Box::new(led)))
    }

    fn container(&self, container: &str, kind: WidgetKind) -> Result<ElementId> {
        self.document.get_element_by_id(container).ok_or_else(|| {
            error!(container, ?kind, "container not found");
            WidgetError::ContainerNotFound(container.to_string())
        })
    }

    /// Reserve an explicit id, or generate `<prefix>_<n>`
    fn claim_id(&mut self, explicit: Option<&str>, kind: WidgetKind) -> Result<String> {
        match explicit {
            Some(id) if self.is_taken(id) => {
                error!(id, ?kind, "widget id already in use");
                Err(WidgetError::DuplicateId(id.to_string()))
            }
            Some(id) => Ok(id.to_string()),
            None => loop {
                self.serial += 1;
                let id = format!("{}_{}", kind.id_prefix(), self.serial);
                if !self.is_taken(&id) {
                    break Ok(id);
                }
            },
        }
    }

    /// Ids collide with widgets and with any element carrying the DOM id,
    /// attached or not
    fn is_taken(&self, id: &str) -> bool {
        self.by_id.contains_key(id) || self.document.has_dom_id(id)
    }

    fn register(&mut self, widget: Box<dyn Widget>) -> String {
        widget.render(&mut self.document);
        let id = widget.id().to_string();
        let hit = widget.hit_target();
        let kind = widget.kind();

        let key = self.widgets.insert(widget);
        self.by_id.insert(id.clone(), key);
        if let Some(target) = hit {
            self.by_target.insert(target, key);
        }
        debug!(%id, ?kind, "widget created");
        id
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Ids of all live widgets, sorted
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.by_id.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Shared access to any widget
    pub fn get(&self, id: &str) -> Option<&dyn Widget> {
        let key = self.by_id.get(id)?;
        self.widgets.get(*key).map(|w| w.as_ref())
    }

    pub fn kind_of(&self, id: &str) -> Option<WidgetKind> {
        self.get(id).map(|w| w.kind())
    }

    /// Current value of a knob or slider
    pub fn value_of(&self, id: &str) -> Option<f64> {
        self.get(id)?.as_continuous().map(|w| w.value())
    }

    /// Current frame of a knob or slider
    pub fn frame_of(&self, id: &str) -> Option<u32> {
        self.get(id)?.as_continuous().map(|w| w.frame())
    }

    /// Current state of a toggle button, switch or LED
    pub fn state_of(&self, id: &str) -> Option<bool> {
        self.get(id)?.as_stateful().map(|w| w.state())
    }

    fn typed<W: Widget>(&mut self, id: &str) -> Option<WidgetMut<'_, W>> {
        let key = *self.by_id.get(id)?;
        let widget = self.widgets.get_mut(key)?.as_any_mut().downcast_mut::<W>()?;
        Some(WidgetMut {
            widget,
            document: &mut self.document,
        })
    }

    pub fn knob(&mut self, id: &str) -> Option<WidgetMut<'_, Knob>> {
        self.typed(id)
    }

    pub fn slider(&mut self, id: &str) -> Option<WidgetMut<'_, Slider>> {
        self.typed(id)
    }

    pub fn toggle_button(&mut self, id: &str) -> Option<WidgetMut<'_, ToggleButton>> {
        self.typed(id)
    }

    pub fn switch(&mut self, id: &str) -> Option<WidgetMut<'_, Switch>> {
        self.typed(id)
    }

    pub fn led(&mut self, id: &str) -> Option<WidgetMut<'_, Led>> {
        self.typed(id)
    }

    /// Mutable access to any knob or slider
    pub fn continuous(&mut self, id: &str) -> Option<WidgetMut<'_, dyn ContinuousWidget>> {
        let key = *self.by_id.get(id)?;
        let widget = self.widgets.get_mut(key)?.as_continuous_mut()?;
        Some(WidgetMut {
            widget,
            document: &mut self.document,
        })
    }

    /// Mutable access to any toggle button, switch or LED
    pub fn stateful(&mut self, id: &str) -> Option<WidgetMut<'_, dyn StatefulWidget>> {
        let key = *self.by_id.get(id)?;
        let widget = self.widgets.get_mut(key)?.as_stateful_mut()?;
        Some(WidgetMut {
            widget,
            document: &mut self.document,
        })
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Detach a widget's elements and forget it; `false` if unknown
    pub fn destroy(&mut self, id: &str) -> bool {
        let Some(key) = self.by_id.remove(id) else {
            debug!(id, "destroy of unknown widget ignored");
            return false;
        };
        let Some(widget) = self.widgets.remove(key) else {
            return false;
        };
        if let Some(target) = widget.hit_target() {
            self.by_target.remove(&target);
        }
        self.captured.retain(|k| *k != key);
        self.document.remove(widget.root());
        debug!(id, kind = ?widget.kind(), "widget destroyed");
        true
    }

    /// Destroy every widget; returns how many were removed
    pub fn destroy_all(&mut self) -> usize {
        let ids: Vec<String> = self.by_id.keys().cloned().collect();
        let mut removed = 0;
        for id in ids {
            if self.destroy(&id) {
                removed += 1;
            }
        }
        removed
    }

    // ========================================================================
    // Event routing
    // ========================================================================

    /// Route one input event; returns whether any widget received it
    pub fn dispatch(&mut self, event: &Event) -> bool {
        let Some(phase) = event.phase() else {
            return false;
        };

        match phase {
            GesturePhase::Press | GesturePhase::Click => {
                let Some(key) = event.target.and_then(|t| self.owner_of(t)) else {
                    trace!(?phase, "event outside any widget");
                    return false;
                };
                self.deliver(key, event);
                true
            }
            GesturePhase::Move | GesturePhase::Release => {
                if self.captured.is_empty() {
                    return false;
                }
                let keys = self.captured.clone();
                for key in keys {
                    self.deliver(key, event);
                }
                if phase == GesturePhase::Release {
                    self.captured.clear();
                }
                true
            }
        }
    }

    /// Whether any widget currently holds the pointer
    pub fn has_capture(&self) -> bool {
        !self.captured.is_empty()
    }

    fn owner_of(&self, target: ElementId) -> Option<WidgetKey> {
        self.document
            .ancestors(target)
            .find_map(|el| self.by_target.get(&el).copied())
    }

    fn deliver(&mut self, key: WidgetKey, event: &Event) {
        let Some(widget) = self.widgets.get_mut(key) else {
            return;
        };
        let capture = widget.handle_event(&mut self.document, event);
        trace!(id = widget.id(), event_type = event.event_type, ?capture, "event delivered");

        match capture {
            Capture::Begin => {
                if !self.captured.contains(&key) {
                    self.captured.push(key);
                }
            }
            Capture::End => self.captured.retain(|k| *k != key),
            Capture::None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackway_core::ElementTag;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn toolkit() -> Toolkit {
        let mut tk = Toolkit::default();
        tk.document_mut().create_container("panel").unwrap();
        tk
    }

    fn hit(tk: &Toolkit, id: &str) -> ElementId {
        tk.get(id).unwrap().hit_target().unwrap()
    }

    #[test]
    fn test_asset_paths() {
        let config = ToolkitConfig::default();
        assert_eq!(config.image_path("led_on.png"), "Assets/led_on.png");
        assert_eq!(
            config.filmstrip_path("knob.png"),
            "Assets/PNG Filmstripes 128 frames/knob.png"
        );

        let flat = ToolkitConfig {
            asset_root: "/static/".to_string(),
            filmstrip_dir: String::new(),
            ..Default::default()
        };
        assert_eq!(flat.filmstrip_path("knob.png"), "static/knob.png");
    }

    #[test]
    fn test_missing_container() {
        let mut tk = toolkit();
        let result = tk.create_knob("nowhere", KnobConfig::new());
        assert_eq!(result, Err(WidgetError::ContainerNotFound("nowhere".to_string())));
        assert!(tk.is_empty());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let mut tk = toolkit();
        let a = tk.create_knob("panel", KnobConfig::new()).unwrap();
        let b = tk.create_knob("panel", KnobConfig::new()).unwrap();
        let c = tk.create_led("panel", LedConfig::new()).unwrap();
        assert_eq!(a, "knob_1");
        assert_eq!(b, "knob_2");
        assert_eq!(c, "led_3");
        assert_eq!(tk.ids(), vec!["knob_1", "knob_2", "led_3"]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut tk = toolkit();
        tk.create_knob("panel", KnobConfig::new().id("volume")).unwrap();
        let result = tk.create_slider("panel", SliderConfig::new().id("volume"));
        assert_eq!(result, Err(WidgetError::DuplicateId("volume".to_string())));
        assert_eq!(tk.kind_of("volume"), Some(WidgetKind::Knob));

        // Container ids are taken too
        let result = tk.create_led("panel", LedConfig::new().id("panel"));
        assert!(matches!(result, Err(WidgetError::DuplicateId(_))));
    }

    #[test]
    fn test_detached_dom_id_blocks_widget_id() {
        let mut tk = toolkit();
        let loose = tk.document_mut().create_element(ElementTag::Div);
        assert!(tk.document_mut().set_dom_id(loose, "volume"));

        let result = tk.create_knob("panel", KnobConfig::new().id("volume"));
        assert_eq!(result, Err(WidgetError::DuplicateId("volume".to_string())));
        assert!(tk.get("volume").is_none());

        // Generated ids skip detached holders as well
        assert!(tk.document_mut().set_dom_id(loose, "knob_1"));
        let id = tk.create_knob("panel", KnobConfig::new()).unwrap();
        assert_eq!(id, "knob_2");
    }

    #[test]
    fn test_initial_render() {
        let mut tk = toolkit();
        let id = tk.create_knob("panel", KnobConfig::new().value(100.0)).unwrap();
        assert_eq!(tk.frame_of(&id), Some(127));
        assert_eq!(tk.value_of(&id), Some(100.0));
    }

    #[test]
    fn test_typed_access_checks_kind() {
        let mut tk = toolkit();
        let id = tk.create_switch("panel", SwitchConfig::new()).unwrap();
        assert!(tk.knob(&id).is_none());
        assert!(tk.switch(&id).is_some());
        assert!(tk.continuous(&id).is_none());
        assert!(tk.stateful(&id).is_some());
    }

    #[test]
    fn test_set_value_clamps_and_notifies() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut tk = toolkit();
        let id = tk
            .create_knob("panel", KnobConfig::new().on_change(move |v| sink.borrow_mut().push(v)))
            .unwrap();

        let mut knob = tk.knob(&id).unwrap();
        knob.set_value(150.0);
        assert_eq!(knob.value(), 100.0);
        assert_eq!(knob.frame(), 127);
        knob.set_value(f64::NAN);
        knob.sync_value(10.0);
        assert_eq!(knob.value(), 10.0);
        assert_eq!(*seen.borrow(), vec![100.0]);
    }

    #[test]
    fn test_knob_drag() {
        let mut tk = toolkit();
        let id = tk.create_knob("panel", KnobConfig::new()).unwrap();
        let target = hit(&tk, &id);

        assert!(tk.dispatch(&Event::pointer_down(target, 40.0, 300.0)));
        assert!(tk.has_capture());
        assert!(tk.dispatch(&Event::pointer_move(40.0, 250.0)));
        assert_eq!(tk.value_of(&id), Some(75.0));
        assert_eq!(tk.frame_of(&id), Some(95));

        assert!(tk.dispatch(&Event::pointer_up(0.0, 0.0)));
        assert!(!tk.has_capture());
        assert!(!tk.dispatch(&Event::pointer_move(40.0, 0.0)));
        assert_eq!(tk.value_of(&id), Some(75.0));
    }

    #[test]
    fn test_press_on_descendant_reaches_widget() {
        let mut tk = toolkit();
        let id = tk.create_knob("panel", KnobConfig::new()).unwrap();
        let surface = hit(&tk, &id);
        let image = tk.document().element(surface).unwrap().children()[0];

        tk.dispatch(&Event::touch_start(image, 0.0, 100.0));
        assert!(tk.knob(&id).unwrap().is_dragging());
        tk.dispatch(&Event::touch_move(0.0, 0.0));
        assert_eq!(tk.value_of(&id), Some(100.0));
        tk.dispatch(&Event::touch_end());
        assert!(!tk.knob(&id).unwrap().is_dragging());
    }

    #[test]
    fn test_moves_only_reach_capturing_widget() {
        let mut tk = toolkit();
        let a = tk.create_slider("panel", SliderConfig::new()).unwrap();
        let b = tk.create_slider("panel", SliderConfig::new()).unwrap();

        tk.dispatch(&Event::pointer_down(hit(&tk, &a), 100.0, 0.0));
        tk.dispatch(&Event::pointer_move(150.0, 0.0));
        tk.dispatch(&Event::pointer_up(150.0, 0.0));

        assert_eq!(tk.value_of(&a), Some(75.0));
        assert_eq!(tk.value_of(&b), Some(50.0));
    }

    #[test]
    fn test_click_toggles_with_callback() {
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let mut tk = toolkit();
        let id = tk
            .create_toggle_button(
                "panel",
                ToggleButtonConfig::new().on_change(move |_| *sink.borrow_mut() += 1),
            )
            .unwrap();

        let target = hit(&tk, &id);
        tk.dispatch(&Event::click(target));
        assert_eq!(tk.state_of(&id), Some(true));
        tk.toggle_button(&id).unwrap().set_state(false);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_release_anywhere_restores_scale() {
        let mut tk = toolkit();
        let id = tk.create_switch("panel", SwitchConfig::new()).unwrap();
        let target = hit(&tk, &id);

        tk.dispatch(&Event::pointer_down(target, 1.0, 1.0));
        assert_eq!(tk.document().element(target).unwrap().style.scale, 0.95);
        tk.dispatch(&Event::pointer_up(900.0, 900.0));
        assert_eq!(tk.document().element(target).unwrap().style.scale, 1.0);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut tk = toolkit();
        let id = tk.create_knob("panel", KnobConfig::new().label("Volume")).unwrap();
        let root = tk.get(&id).unwrap().root();
        let target = hit(&tk, &id);

        assert!(tk.destroy(&id));
        assert!(!tk.contains(&id));
        assert!(tk.knob(&id).is_none());
        assert!(!tk.document().contains(root));
        assert!(!tk.dispatch(&Event::pointer_down(target, 0.0, 0.0)));
        assert!(!tk.destroy(&id));

        // The id is free again
        assert!(tk.create_knob("panel", KnobConfig::new().id(id.as_str())).is_ok());
    }

    #[test]
    fn test_destroy_during_drag_drops_capture() {
        let mut tk = toolkit();
        let id = tk.create_knob("panel", KnobConfig::new()).unwrap();
        tk.dispatch(&Event::pointer_down(hit(&tk, &id), 0.0, 0.0));
        tk.destroy(&id);
        assert!(!tk.has_capture());
        assert!(!tk.dispatch(&Event::pointer_move(0.0, -10.0)));
    }

    #[test]
    fn test_destroy_all() {
        let mut tk = toolkit();
        tk.create_knob("panel", KnobConfig::new()).unwrap();
        tk.create_led("panel", LedConfig::new()).unwrap();
        assert_eq!(tk.destroy_all(), 2);
        assert!(tk.is_empty());
        let panel = tk.document().get_element_by_id("panel").unwrap();
        assert!(tk.document().element(panel).unwrap().children().is_empty());
    }
}
