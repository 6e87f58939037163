//! Blackway Core Runtime
//!
//! Foundational primitives for the Blackway control toolkit:
//!
//! - **Visual Tree**: retained elements with CSS-renderable styles
//! - **Events**: pointer, touch and click input with a shared gesture model
//! - **State Machines**: flat interaction states for widgets
//! - **Filmstrips**: value-to-frame mapping for sprite-strip assets
//!
//! # Example
//!
//! ```rust
//! use blackway_core::document::{Background, Document, ElementStyle, ElementTag};
//! use blackway_core::filmstrip::{Filmstrip, StripAxis, ValueRange};
//!
//! let mut doc = Document::new();
//! let panel = doc.create_container("panel").unwrap();
//! let knob = doc.create_element(ElementTag::Div);
//! doc.append_child(panel, knob);
//!
//! let strip = Filmstrip::new("knob.png", 80.0, StripAxis::Horizontal);
//! let (w, h) = strip.strip_size();
//! doc.element_mut(knob).unwrap().style =
//!     ElementStyle::new().size(80.0, 80.0).background(Background::strip(strip.image(), w, h));
//!
//! let range = ValueRange::new(0.0, 100.0).unwrap();
//! let (x, y) = strip.offset(strip.frame_for(&range, 75.0));
//! doc.style_mut(knob).unwrap().set_background_offset(x, y);
//! ```

pub mod document;
pub mod error;
pub mod events;
pub mod filmstrip;
pub mod fsm;

pub use document::{Document, ElementId, ElementStyle, ElementTag};
pub use error::{CoreError, Result};
pub use events::{Event, EventData, EventType, GesturePhase};
pub use filmstrip::{frame_index, Filmstrip, StripAxis, ValueRange, DEFAULT_FRAME_COUNT};
pub use fsm::{StateId, StateMachine, Transition};
