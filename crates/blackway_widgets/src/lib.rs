//! Blackway Widget Library
//!
//! Filmstrip-based audio controls with FSM-driven interactions:
//!
//! - [`Knob`]: rotary control, drag up to raise
//! - [`Slider`]: linear control, horizontal or vertical
//! - [`ToggleButton`] and [`Switch`]: two-state image buttons
//! - [`Led`]: passive status lamp
//!
//! All widgets live in a [`Toolkit`], which owns the visual tree and routes
//! input events to them.
//!
//! ```
//! use blackway_widgets::{KnobConfig, Toolkit};
//!
//! let mut toolkit = Toolkit::default();
//! toolkit.document_mut().create_container("controls");
//!
//! let id = toolkit
//!     .create_knob("controls", KnobConfig::new().id("volume").range(0.0, 1.0).value(0.7))
//!     .unwrap();
//!
//! let mut knob = toolkit.knob(&id).unwrap();
//! knob.set_value(2.0);
//! assert_eq!(knob.value(), 1.0);
//! assert_eq!(knob.frame(), 127);
//! ```

mod continuous;
pub mod error;
pub mod knob;
mod latch;
pub mod led;
pub mod slider;
pub mod toggle;
pub mod toolkit;
pub mod widget;

pub use error::{Result, WidgetError};
pub use knob::{Knob, KnobConfig, DEFAULT_KNOB_TRAVEL};
pub use latch::PRESSED_SCALE;
pub use led::{Led, LedConfig};
pub use slider::{Slider, SliderConfig};
pub use toggle::{Switch, SwitchConfig, ToggleButton, ToggleButtonConfig};
pub use toolkit::{Toolkit, ToolkitConfig};
pub use widget::{
    Capture, ChangeCallback, ContinuousWidget, Orientation, StatefulWidget, ToggleWidget, Widget,
    WidgetKey, WidgetKind, WidgetMut,
};
