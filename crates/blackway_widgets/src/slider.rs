//! Linear slider drawn from a filmstrip

use std::any::Any;
use std::fmt;

use blackway_core::document::{Background, Document, ElementStyle, ElementTag};
use blackway_core::{ElementId, Event, Filmstrip, StripAxis, ValueRange};
use serde::Deserialize;
use tracing::warn;

use crate::continuous::{ContinuousControl, DragAxis, DragDirection, DragStep};
use crate::error::{positive, Result};
use crate::toolkit::ToolkitConfig;
use crate::widget::{
    label_text, Capture, ChangeCallback, ContinuousWidget, Orientation, Widget, WidgetKind,
};

/// Slider configuration
#[derive(Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SliderConfig {
    pub id: Option<String>,
    pub min: f64,
    pub max: f64,
    pub value: f64,
    pub filmstrip: String,
    pub orientation: Orientation,
    /// Length along the slide axis
    pub width: f32,
    /// Thickness across the slide axis, also the frame size
    pub height: f32,
    pub label: Option<String>,
    /// Pointer travel for the full range; defaults to `width`
    pub drag_travel: Option<f32>,
    #[serde(skip)]
    pub on_change: Option<ChangeCallback<f64>>,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            id: None,
            min: 0.0,
            max: 100.0,
            value: 50.0,
            filmstrip: "slider_horizontal_128_frames.png".to_string(),
            orientation: Orientation::Horizontal,
            width: 200.0,
            height: 30.0,
            label: None,
            drag_travel: None,
            on_change: None,
        }
    }
}

impl fmt::Debug for SliderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliderConfig")
            .field("id", &self.id)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("value", &self.value)
            .field("filmstrip", &self.filmstrip)
            .field("orientation", &self.orientation)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl SliderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn filmstrip(mut self, file: impl Into<String>) -> Self {
        self.filmstrip = file.into();
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set length and thickness
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn drag_travel(mut self, travel: f32) -> Self {
        self.drag_travel = Some(travel);
        self
    }

    pub fn on_change(mut self, callback: impl FnMut(f64) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }
}

/// Slider widget
pub struct Slider {
    id: String,
    root: ElementId,
    track: ElementId,
    image: ElementId,
    orientation: Orientation,
    strip: Filmstrip,
    control: ContinuousControl,
}

impl Slider {
    pub(crate) fn build(
        document: &mut Document,
        parent: ElementId,
        id: String,
        config: SliderConfig,
        assets: &ToolkitConfig,
    ) -> Result<Self> {
        let range = ValueRange::new(config.min, config.max)?;
        let width = positive("slider width", config.width)?;
        let height = positive("slider height", config.height)?;
        let travel = positive("drag travel", config.drag_travel.unwrap_or(width))?;

        let (axis, strip_axis, (track_w, track_h)) = match config.orientation {
            Orientation::Horizontal => (DragAxis::X, StripAxis::Horizontal, (width, height)),
            Orientation::Vertical => (DragAxis::Y, StripAxis::Vertical, (height, width)),
        };
        let strip = Filmstrip::new(assets.filmstrip_path(&config.filmstrip), height, strip_axis)
            .with_frame_count(assets.frame_count)?;

        let wrapper = document.create_element(ElementTag::Div);
        if let Some(el) = document.element_mut(wrapper) {
            el.style = ElementStyle::new().centered_text();
        }

        let track = document.create_element(ElementTag::Div);
        if !document.set_dom_id(track, &id) {
            warn!(%id, "dom id held by another element");
        }
        if let Some(el) = document.element_mut(track) {
            el.class = Some("slider-container-filmstrip".to_string());
            el.style = ElementStyle::new().size(track_w, track_h).interactive();
        }

        let (strip_w, strip_h) = strip.strip_size();
        let image = document.create_element(ElementTag::Div);
        if let Some(el) = document.element_mut(image) {
            el.class = Some("slider-image".to_string());
            el.style = ElementStyle::new()
                .fill()
                .background(Background::strip(strip.image(), strip_w, strip_h))
                .pixelated();
        }
        document.append_child(track, image);
        document.append_child(wrapper, track);

        if let Some(text) = label_text(&config.label) {
            let caption = document.create_element(ElementTag::Div);
            if let Some(el) = document.element_mut(caption) {
                el.class = Some("slider-label".to_string());
                el.text = Some(text.to_string());
            }
            document.append_child(wrapper, caption);
        }
        document.append_child(parent, wrapper);

        let control = ContinuousControl::new(
            range,
            config.value,
            travel,
            axis,
            DragDirection::Direct,
            config.on_change,
        );

        Ok(Self {
            id,
            root: wrapper,
            track,
            image,
            orientation: config.orientation,
            strip,
            control,
        })
    }

    pub fn range(&self) -> ValueRange {
        self.control.range()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn filmstrip(&self) -> &Filmstrip {
        &self.strip
    }

    fn store(&mut self, document: &mut Document, value: f64) -> bool {
        if !self.control.store(value) {
            warn!(slider = %self.id, value, "ignoring non-finite slider value");
            return false;
        }
        self.render(document);
        true
    }
}

impl Widget for Slider {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::Slider
    }

    fn root(&self) -> ElementId {
        self.root
    }

    fn hit_target(&self) -> Option<ElementId> {
        Some(self.track)
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

impl ContinuousWidget for Slider {
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
        if self.store(document, value) {
            self.control.notify();
        }
    }

    fn sync_value(&mut self, document: &mut Document, value: f64) {
        self.store(document, value);
    }
}
