//! Toggle buttons and switches

use std::any::Any;
use std::fmt;

use blackway_core::{Document, ElementId, Event};
use serde::Deserialize;

use crate::latch::{ImagePair, LatchButton};
use crate::toolkit::ToolkitConfig;
use crate::widget::{
    Capture, ChangeCallback, Orientation, StatefulWidget, ToggleWidget, Widget, WidgetKind,
};

/// Toggle button configuration
#[derive(Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToggleButtonConfig {
    pub id: Option<String>,
    /// Image file shown while on
    pub on_image: String,
    /// Image file shown while off
    pub off_image: String,
    pub initial_state: bool,
    /// Button text
    pub label: Option<String>,
    #[serde(skip)]
    pub on_change: Option<ChangeCallback<bool>>,
}

impl Default for ToggleButtonConfig {
    fn default() -> Self {
        Self {
            id: None,
            on_image: "button_rectangular_small_on.png".to_string(),
            off_image: "button_rectangular_small_off.png".to_string(),
            initial_state: false,
            label: None,
            on_change: None,
        }
    }
}

impl fmt::Debug for ToggleButtonConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleButtonConfig")
            .field("id", &self.id)
            .field("on_image", &self.on_image)
            .field("off_image", &self.off_image)
            .field("initial_state", &self.initial_state)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl ToggleButtonConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the on and off images
    pub fn images(mut self, on: impl Into<String>, off: impl Into<String>) -> Self {
        self.on_image = on.into();
        self.off_image = off.into();
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

    pub fn on_change(mut self, callback: impl FnMut(bool) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }
}

/// Switch configuration; images follow the orientation
#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwitchConfig {
    pub id: Option<String>,
    pub orientation: Orientation,
    pub initial_state: bool,
    pub label: Option<String>,
    #[serde(skip)]
    pub on_change: Option<ChangeCallback<bool>>,
}

impl fmt::Debug for SwitchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwitchConfig")
            .field("id", &self.id)
            .field("orientation", &self.orientation)
            .field("initial_state", &self.initial_state)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl SwitchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
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

    pub fn on_change(mut self, callback: impl FnMut(bool) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }
}

/// Image toggle button
pub struct ToggleButton {
    inner: LatchButton,
}

impl ToggleButton {
    pub(crate) fn build(
        document: &mut Document,
        parent: ElementId,
        id: String,
        config: ToggleButtonConfig,
        assets: &ToolkitConfig,
    ) -> Self {
        let images = ImagePair {
            on: assets.image_path(&config.on_image),
            off: assets.image_path(&config.off_image),
        };
        let inner = LatchButton::build(
            document,
            parent,
            id,
            "toggle-button",
            (100.0, 40.0),
            images,
            config.initial_state,
            &config.label,
            config.on_change,
        );
        Self { inner }
    }

    /// Whether the button is held down
    pub fn is_pressed(&self) -> bool {
        self.inner.is_pressed()
    }
}

/// On/off switch
pub struct Switch {
    inner: LatchButton,
    orientation: Orientation,
}

impl Switch {
    pub(crate) fn build(
        document: &mut Document,
        parent: ElementId,
        id: String,
        config: SwitchConfig,
        assets: &ToolkitConfig,
    ) -> Self {
        let axis = match config.orientation {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        };
        let images = ImagePair {
            on: assets.image_path(&format!("switch_{axis}_on.png")),
            off: assets.image_path(&format!("switch_{axis}_off.png")),
        };
        let inner = LatchButton::build(
            document,
            parent,
            id,
            "switch-button",
            (60.0, 30.0),
            images,
            config.initial_state,
            &config.label,
            config.on_change,
        );
        Self {
            inner,
            orientation: config.orientation,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_pressed(&self) -> bool {
        self.inner.is_pressed()
    }
}

macro_rules! latch_widget {
    ($ty:ty, $kind:expr) => {
        impl Widget for $ty {
            fn id(&self) -> &str {
                &self.inner.id
            }

            fn kind(&self) -> WidgetKind {
                $kind
            }

            fn root(&self) -> ElementId {
                self.inner.button
            }

            fn hit_target(&self) -> Option<ElementId> {
                Some(self.inner.button)
            }

            fn render(&self, document: &mut Document) {
                self.inner.render(document);
            }

            fn handle_event(&mut self, document: &mut Document, event: &Event) -> Capture {
                self.inner.handle_event(document, event)
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

        impl StatefulWidget for $ty {
            fn state(&self) -> bool {
                self.inner.state()
            }

            fn set_state(&mut self, document: &mut Document, state: bool) {
                self.inner.set_state(document, state);
            }
        }

        impl ToggleWidget for $ty {
            fn toggle(&mut self, document: &mut Document) -> bool {
                self.inner.toggle(document)
            }
        }
    };
}

latch_widget!(ToggleButton, WidgetKind::ToggleButton);
latch_widget!(Switch, WidgetKind::Switch);
