//! Input events
//!
//! Pointer, touch and click events as delivered by the host page. Mouse and
//! touch input share one gesture model: press, move, release.

use smallvec::{smallvec, SmallVec};

use crate::document::ElementId;

/// Event type identifier
pub type EventType = u32;

/// Input event types
pub mod event_types {
    use super::EventType;

    pub const POINTER_DOWN: EventType = 1;
    pub const POINTER_UP: EventType = 2;
    pub const POINTER_MOVE: EventType = 3;
    pub const CLICK: EventType = 8;
    pub const TOUCH_START: EventType = 12;
    pub const TOUCH_MOVE: EventType = 13;
    pub const TOUCH_END: EventType = 14;
}

/// Gesture phase shared by mouse and touch input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    Press,
    Move,
    Release,
    Click,
}

impl GesturePhase {
    /// Phase for a raw event type, `None` for types the toolkit ignores
    pub fn of(event_type: EventType) -> Option<Self> {
        use event_types::*;
        match event_type {
            POINTER_DOWN | TOUCH_START => Some(Self::Press),
            POINTER_MOVE | TOUCH_MOVE => Some(Self::Move),
            POINTER_UP | TOUCH_END => Some(Self::Release),
            CLICK => Some(Self::Click),
            _ => None,
        }
    }
}

/// One active touch point, in client coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
}

/// A UI event with associated data
#[derive(Clone, Debug)]
pub struct Event {
    pub event_type: EventType,
    /// Element under the pointer, if any
    pub target: Option<ElementId>,
    pub data: EventData,
}

/// Event-specific data
#[derive(Clone, Debug)]
pub enum EventData {
    Pointer {
        x: f32,
        y: f32,
        button: u8,
    },
    Touch {
        touches: SmallVec<[TouchPoint; 2]>,
    },
    None,
}

impl Event {
    fn pointer(event_type: EventType, target: Option<ElementId>, x: f32, y: f32) -> Self {
        Self {
            event_type,
            target,
            data: EventData::Pointer { x, y, button: 0 },
        }
    }

    fn touch(event_type: EventType, target: Option<ElementId>, x: f32, y: f32) -> Self {
        Self {
            event_type,
            target,
            data: EventData::Touch {
                touches: smallvec![TouchPoint { x, y }],
            },
        }
    }

    /// Primary button pressed over `target`
    pub fn pointer_down(target: ElementId, x: f32, y: f32) -> Self {
        Self::pointer(event_types::POINTER_DOWN, Some(target), x, y)
    }

    /// Pointer moved; move events are not bound to an element
    pub fn pointer_move(x: f32, y: f32) -> Self {
        Self::pointer(event_types::POINTER_MOVE, None, x, y)
    }

    /// Primary button released anywhere
    pub fn pointer_up(x: f32, y: f32) -> Self {
        Self::pointer(event_types::POINTER_UP, None, x, y)
    }

    /// Click (press and release) on `target`
    pub fn click(target: ElementId) -> Self {
        Self {
            event_type: event_types::CLICK,
            target: Some(target),
            data: EventData::None,
        }
    }

    /// First finger down over `target`
    pub fn touch_start(target: ElementId, x: f32, y: f32) -> Self {
        Self::touch(event_types::TOUCH_START, Some(target), x, y)
    }

    /// Finger moved
    pub fn touch_move(x: f32, y: f32) -> Self {
        Self::touch(event_types::TOUCH_MOVE, None, x, y)
    }

    /// Finger lifted; carries no touch points
    pub fn touch_end() -> Self {
        Self {
            event_type: event_types::TOUCH_END,
            target: None,
            data: EventData::Touch {
                touches: SmallVec::new(),
            },
        }
    }

    /// Gesture phase of this event
    pub fn phase(&self) -> Option<GesturePhase> {
        GesturePhase::of(self.event_type)
    }

    /// Client position of the pointer or of the first touch
    pub fn position(&self) -> Option<(f32, f32)> {
        match &self.data {
            EventData::Pointer { x, y, .. } => Some((*x, *y)),
            EventData::Touch { touches } => touches.first().map(|t| (t.x, t.y)),
            EventData::None => None,
        }
    }
}
