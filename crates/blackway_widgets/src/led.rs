//! Passive status lamp

use std::any::Any;

use blackway_core::document::{Background, BackgroundSize, Document, ElementStyle, ElementTag};
use blackway_core::{ElementId, Event};
use serde::Deserialize;

use crate::error::{positive, Result};
use crate::toolkit::ToolkitConfig;
use crate::widget::{label_text, Capture, StatefulWidget, Widget, WidgetKind};
use tracing::warn;

/// LED configuration
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LedConfig {
    pub id: Option<String>,
    pub initial_state: bool,
    pub label: Option<String>,
    /// Lamp edge length in pixels
    pub size: f32,
}

impl Default for LedConfig {
    fn default() -> Self {
        Self {
            id: None,
            initial_state: false,
            label: None,
            size: 20.0,
        }
    }
}

impl LedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn initial_state(mut self, state: bool) -> Self {
        self.initial_state = state;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }
}

/// LED indicator; ignores all input
pub struct Led {
    id: String,
    root: ElementId,
    lamp: ElementId,
    on_image: String,
    off_image: String,
    state: bool,
}

impl Led {
    pub(crate) fn build(
        document: &mut Document,
        parent: ElementId,
        id: String,
        config: LedConfig,
        assets: &ToolkitConfig,
    ) -> Result<Self> {
        let size = positive("led size", config.size)?;
        let on_image = assets.image_path("led_on.png");
        let off_image = assets.image_path("led_off.png");

        let root = document.create_element(ElementTag::Div);
        if !document.set_dom_id(root, &id) {
            warn!(%id, "dom id held by another element");
        }
        if let Some(el) = document.element_mut(root) {
            el.class = Some("led-container".to_string());
            el.style = ElementStyle::new().centered_text();
        }

        let image = if config.initial_state { &on_image } else { &off_image };
        let lamp = document.create_element(ElementTag::Div);
        if let Some(el) = document.element_mut(lamp) {
            el.class = Some("led".to_string());
            el.style = ElementStyle::new()
                .size(size, size)
                .background(Background::centered(image.as_str(), BackgroundSize::Contain));
        }
        document.append_child(root, lamp);

        if let Some(text) = label_text(&config.label) {
            let caption = document.create_element(ElementTag::Div);
            if let Some(el) = document.element_mut(caption) {
                el.class = Some("led-label".to_string());
                el.text = Some(text.to_string());
            }
            document.append_child(root, caption);
        }
        document.append_child(parent, root);

        Ok(Self {
            id,
            root,
            lamp,
            on_image,
            off_image,
            state: config.initial_state,
        })
    }
}

impl Widget for Led {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::Led
    }

    fn root(&self) -> ElementId {
        self.root
    }

    fn hit_target(&self) -> Option<ElementId> {
        None
    }

    fn render(&self, document: &mut Document) {
        let image = if self.state { &self.on_image } else { &self.off_image };
        if let Some(style) = document.style_mut(self.lamp) {
            style.set_background_image(image.as_str());
        }
    }

    fn handle_event(&mut self, _document: &mut Document, _event: &Event) -> Capture {
        Capture::None
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_stateful(&self) -> Option<&dyn StatefulWidget> {
        Some(self)
    }

    fn as_stateful_mut(&mut self) -> Option<&mut (dyn StatefulWidget + 'static)> {
        Some(self)
    }
}

impl StatefulWidget for Led {
    fn state(&self) -> bool {
        self.state
    }

    fn set_state(&mut self, document: &mut Document, state: bool) {
        self.state = state;
        self.render(document);
    }
}
