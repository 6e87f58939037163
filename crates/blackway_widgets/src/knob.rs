//! Rotary knob drawn from a filmstrip
//!
//! Dragging up raises the value, dragging down lowers it. Each value maps to
//! one frame of a horizontal strip; the frame is shown by shifting the
//! strip's background position.

use std::any::Any;
use std::fmt;

use blackway_core::document::{Background, Document, ElementStyle, ElementTag};
use blackway_core::{ElementId, Event, Filmstrip, StripAxis, ValueRange};
use serde::Deserialize;
use tracing::warn;

use crate::continuous::{ContinuousControl, DragAxis, DragDirection, DragStep};
use crate::error::{positive, Result};
use crate::toolkit::ToolkitConfig;
use crate::widget::{label_text, Capture, ChangeCallback, ContinuousWidget, Widget, WidgetKind};

/// Pointer travel that sweeps a knob's full range
pub const DEFAULT_KNOB_TRAVEL: f32 = 200.0;

/// Knob configuration
#[derive(Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KnobConfig {
    /// Explicit id; generated when absent
    pub id: Option<String>,
    pub min: f64,
    pub max: f64,
    /// Starting value (clamped)
    pub value: f64,
    /// Filmstrip file inside the filmstrip directory
    pub filmstrip: String,
    /// Rendered edge length in pixels
    pub size: f32,
    pub label: Option<String>,
    /// Pointer travel for the full range, in pixels
    pub drag_travel: Option<f32>,
    #[serde(skip)]
    pub on_change: Option<ChangeCallback<f64>>,
}

impl Default for KnobConfig {
    fn default() -> Self {
        Self {
            id: None,
            min: 0.0,
            max: 100.0,
            value: 50.0,
            filmstrip: "knob_small_black_128_frames.png".to_string(),
            size: 80.0,
            label: None,
            drag_travel: None,
            on_change: None,
        }
    }
}

impl fmt::Debug for KnobConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KnobConfig")
            .field("id", &self.id)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("value", &self.value)
            .field("filmstrip", &self.filmstrip)
            .field("size", &self.size)
            .field("label", &self.label)
            .field("drag_travel", &self.drag_travel)
            .finish_non_exhaustive()
    }
}

impl KnobConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an explicit id
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the value range
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Set the starting value
    pub fn value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    /// Set the filmstrip file
    pub fn filmstrip(mut self, file: impl Into<String>) -> Self {
        self.filmstrip = file.into();
        self
    }

    /// Set the rendered size
    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Set the caption shown under the knob
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the pointer travel for the full range
    pub fn drag_travel(mut self, travel: f32) -> Self {
        self.drag_travel = Some(travel);
        self
    }

    /// Set the change observer
    pub fn on_change(mut self, callback: impl FnMut(f64) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }
}

/// Rotary knob widget
pub struct Knob {
    id: String,
    root: ElementId,
    surface: ElementId,
    image: ElementId,
    strip: Filmstrip,
    control: ContinuousControl,
}

impl Knob {
    /// Validate `config` and attach the knob's elements under `parent`
    pub(crate) fn build(
        document: &mut Document,
        parent: ElementId,
        id: String,
        config: KnobConfig,
        assets: &ToolkitConfig,
    ) -> Result<Self> {
        let range = ValueRange::new(config.min, config.max)?;
        let size = positive("knob size", config.size)?;
        let travel = positive("drag travel", config.drag_travel.unwrap_or(DEFAULT_KNOB_TRAVEL))?;
        let strip = Filmstrip::new(
            assets.filmstrip_path(&config.filmstrip),
            size,
            StripAxis::Horizontal,
        )
        .with_frame_count(assets.frame_count)?;

        let label = label_text(&config.label);
        let surface = document.create_element(ElementTag::Div);
        if !document.set_dom_id(surface, &id) {
            warn!(%id, "dom id held by another element");
        }
        if let Some(el) = document.element_mut(surface) {
            el.class = Some("knob-container".to_string());
            el.style = ElementStyle::new().size(size, size).interactive();
        }

        let (strip_w, strip_h) = strip.strip_size();
        let image = document.create_element(ElementTag::Div);
        if let Some(el) = document.element_mut(image) {
            el.class = Some("knob-image".to_string());
            el.style = ElementStyle::new()
                .fill()
                .background(Background::strip(strip.image(), strip_w, strip_h))
                .pixelated();
        }
        document.append_child(surface, image);

        let root = match label {
            Some(text) => {
                let wrapper = document.create_element(ElementTag::Div);
                if let Some(el) = document.element_mut(wrapper) {
                    el.style = ElementStyle::new().centered_text();
                }
                let caption = document.create_element(ElementTag::Div);
                if let Some(el) = document.element_mut(caption) {
                    el.class = Some("knob-label".to_string());
                    el.text = Some(text.to_string());
                }
                document.append_child(wrapper, surface);
                document.append_child(wrapper, caption);
                wrapper
            }
            None => surface,
        };
        document.append_child(parent, root);

        let control = ContinuousControl::new(
            range,
            config.value,
            travel,
            DragAxis::Y,
            DragDirection::Inverted,
            config.on_change,
        );

        Ok(Self {
            id,
            root,
            surface,
            image,
            strip,
            control,
        })
    }

    /// Validated value range
    pub fn range(&self) -> ValueRange {
        self.control.range()
    }

    pub fn filmstrip(&self) -> &Filmstrip {
        &self.strip
    }
}

impl Widget for Knob {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::Knob
    }

    fn root(&self) -> ElementId {
        self.root
    }

    fn hit_target(&self) -> Option<ElementId> {
        Some(self.surface)
    }

    fn render(&self, document: &mut Document) {
        let (x, y) = self.strip.offset(self.frame());
        if let Some(style) = document.style_mut(self.image) {
            style.set_background_offset(x, y);
        }
    }

    fn handle_event(&mut self, document: &mut Document, event: &Event) -> Capture {
        match self.control.step(event) {
            DragStep::Started => Capture::Begin,
            DragStep::Moved(value) => {
                self.set_value(document, value);
                Capture::None
            }
            DragStep::Ended => Capture::End,
            DragStep::Ignored => Capture::None,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_continuous(&self) -> Option<&dyn ContinuousWidget> {
        Some(self)
    }

    fn as_continuous_mut(&mut self) -> Option<&mut (dyn ContinuousWidget + 'static)> {
        Some(self)
    }
}

impl ContinuousWidget for Knob {
    fn value(&self) -> f64 {
        self.control.value()
    }

    fn frame(&self) -> u32 {
        self.strip.frame_for(&self.control.range(), self.control.value())
    }

    fn is_dragging(&self) -> bool {
        self.control.is_dragging()
    }

    fn set_value(&mut self, document: &mut Document, value: f64) {
        if !self.control.store(value) {
            warn!(knob = %self.id, value, "ignoring non-finite knob value");
            return;
        }
        self.render(document);
        self.control.notify();
    }

    fn sync_value(&mut self, document: &mut Document, value: f64) {
        if !self.control.store(value) {
            warn!(knob = %self.id, value, "ignoring non-finite knob value");
            return;
        }
        self.render(document);
    }
}
