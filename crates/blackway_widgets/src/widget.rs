//! Base widget traits and types

use std::any::Any;
use std::ops::{Deref, DerefMut};

use blackway_core::{Document, ElementId, Event};
use serde::Deserialize;
use slotmap::new_key_type;

new_key_type! {
    /// Registry slot of a widget inside a [`Toolkit`](crate::Toolkit)
    pub struct WidgetKey;
}

/// Observer invoked with a widget's new value or state
pub type ChangeCallback<T> = Box<dyn FnMut(T)>;

/// Concrete widget variants
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Knob,
    Slider,
    ToggleButton,
    Switch,
    Led,
}

impl WidgetKind {
    /// Prefix used for generated ids
    pub fn id_prefix(&self) -> &'static str {
        match self {
            WidgetKind::Knob => "knob",
            WidgetKind::Slider => "slider",
            WidgetKind::ToggleButton => "toggle",
            WidgetKind::Switch => "switch",
            WidgetKind::Led => "led",
        }
    }
}

/// Layout direction of sliders and switches
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Pointer capture request returned from event handling
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capture {
    /// Leave routing unchanged
    None,
    /// Route moves and releases to this widget until it ends
    Begin,
    /// Stop routing moves and releases to this widget
    End,
}

/// Base trait for all widgets
pub trait Widget: Any {
    /// Get the widget's unique ID
    fn id(&self) -> &str;

    /// Variant of this widget
    fn kind(&self) -> WidgetKind;

    /// Outermost element the widget created and owns
    fn root(&self) -> ElementId;

    /// Element that receives presses and clicks; `None` for passive widgets
    fn hit_target(&self) -> Option<ElementId>;

    /// Write the current value or state into the visual tree
    fn render(&self, document: &mut Document);

    /// Handle an event routed to this widget
    fn handle_event(&mut self, document: &mut Document, event: &Event) -> Capture;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn as_continuous(&self) -> Option<&dyn ContinuousWidget> {
        None
    }

    fn as_continuous_mut(&mut self) -> Option<&mut (dyn ContinuousWidget + 'static)> {
        None
    }

    fn as_stateful(&self) -> Option<&dyn StatefulWidget> {
        None
    }

    fn as_stateful_mut(&mut self) -> Option<&mut (dyn StatefulWidget + 'static)> {
        None
    }
}

/// Widgets holding a clamped real value (Knob, Slider)
pub trait ContinuousWidget: Widget {
    /// Last clamped value
    fn value(&self) -> f64;

    /// Filmstrip frame currently shown
    fn frame(&self) -> u32;

    /// Whether a drag gesture is in progress
    fn is_dragging(&self) -> bool;

    /// Clamp, repaint and notify the change observer
    fn set_value(&mut self, document: &mut Document, value: f64);

    /// Clamp and repaint without notifying (host-driven sync)
    fn sync_value(&mut self, document: &mut Document, value: f64);
}

/// Widgets holding an on/off state (ToggleButton, Switch, LED)
pub trait StatefulWidget: Widget {
    fn state(&self) -> bool;

    /// Overwrite the state and repaint; never notifies
    fn set_state(&mut self, document: &mut Document, state: bool);
}

/// User-togglable widgets (ToggleButton, Switch)
pub trait ToggleWidget: StatefulWidget {
    /// Flip the state, repaint and notify; returns the new state
    fn toggle(&mut self, document: &mut Document) -> bool;
}

/// Mutable view of one registered widget together with the visual tree
pub struct WidgetMut<'a, W: ?Sized> {
    pub(crate) widget: &'a mut W,
    pub(crate) document: &'a mut Document,
}

impl<W: ?Sized> Deref for WidgetMut<'_, W> {
    type Target = W;

    fn deref(&self) -> &W {
        self.widget
    }
}

impl<W: ?Sized> DerefMut for WidgetMut<'_, W> {
    fn deref_mut(&mut self) -> &mut W {
        self.widget
    }
}

impl<W: ContinuousWidget + ?Sized> WidgetMut<'_, W> {
    pub fn value(&self) -> f64 {
        self.widget.value()
    }

    pub fn frame(&self) -> u32 {
        self.widget.frame()
    }

    pub fn is_dragging(&self) -> bool {
        self.widget.is_dragging()
    }

    pub fn set_value(&mut self, value: f64) {
        self.widget.set_value(self.document, value);
    }

    pub fn sync_value(&mut self, value: f64) {
        self.widget.sync_value(self.document, value);
    }
}

impl<W: StatefulWidget + ?Sized> WidgetMut<'_, W> {
    pub fn state(&self) -> bool {
        self.widget.state()
    }

    pub fn set_state(&mut self, state: bool) {
        self.widget.set_state(self.document, state);
    }
}

impl<W: ToggleWidget + ?Sized> WidgetMut<'_, W> {
    pub fn toggle(&mut self) -> bool {
        self.widget.toggle(self.document)
    }
}

/// Treat empty labels as absent
pub(crate) fn label_text(label: &Option<String>) -> Option<&str> {
    label.as_deref().filter(|l| !l.is_empty())
}
