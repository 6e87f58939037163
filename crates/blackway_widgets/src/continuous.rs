//! Drag-to-value control shared by knobs and sliders
//!
//! A press anchors the gesture at the pointer coordinate and the current
//! value. Every later move maps the pointer's distance from the anchor to a
//! value change of `span / travel` per pixel, so dragging across the whole
//! travel sweeps the whole range. Releasing anywhere ends the gesture.

use blackway_core::events::{event_types, Event, GesturePhase};
use blackway_core::fsm::StateMachine;
use blackway_core::ValueRange;

use crate::widget::ChangeCallback;

/// Drag states
pub mod states {
    pub const IDLE: u32 = 0;
    pub const DRAGGING: u32 = 1;
}

/// How pointer motion along the drag axis maps to value changes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragDirection {
    /// Moving toward smaller coordinates raises the value (up on a knob)
    Inverted,
    /// Moving toward larger coordinates raises the value
    Direct,
}

/// Axis of the pointer position that drives the drag
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragAxis {
    X,
    Y,
}

impl DragAxis {
    fn pick(self, (x, y): (f32, f32)) -> f32 {
        match self {
            DragAxis::X => x,
            DragAxis::Y => y,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct DragAnchor {
    position: f32,
    value: f64,
}

/// Result of feeding an event to a [`ContinuousControl`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum DragStep {
    Started,
    /// Unclamped value the pointer now points at
    Moved(f64),
    Ended,
    Ignored,
}

pub(crate) struct ContinuousControl {
    range: ValueRange,
    value: f64,
    travel: f32,
    axis: DragAxis,
    direction: DragDirection,
    fsm: StateMachine,
    anchor: Option<DragAnchor>,
    on_change: Option<ChangeCallback<f64>>,
}

impl ContinuousControl {
    pub(crate) fn new(
        range: ValueRange,
        initial: f64,
        travel: f32,
        axis: DragAxis,
        direction: DragDirection,
        on_change: Option<ChangeCallback<f64>>,
    ) -> Self {
        let value = if initial.is_finite() {
            range.clamp(initial)
        } else {
            range.min()
        };
        let fsm = StateMachine::builder(states::IDLE)
            .on(states::IDLE, event_types::POINTER_DOWN, states::DRAGGING)
            .on(states::DRAGGING, event_types::POINTER_UP, states::IDLE)
            .build();

        Self {
            range,
            value,
            travel,
            axis,
            direction,
            fsm,
            anchor: None,
            on_change,
        }
    }

    pub(crate) fn range(&self) -> ValueRange {
        self.range
    }

    pub(crate) fn value(&self) -> f64 {
        self.value
    }

    pub(crate) fn is_dragging(&self) -> bool {
        self.fsm.is_in(states::DRAGGING)
    }

    /// Store `value` clamped to the range; non-finite input is rejected
    pub(crate) fn store(&mut self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        self.value = self.range.clamp(value);
        true
    }

    pub(crate) fn notify(&mut self) {
        let value = self.value;
        if let Some(callback) = self.on_change.as_mut() {
            callback(value);
        }
    }

    /// Value change per pixel of pointer travel
    fn sensitivity(&self) -> f64 {
        self.range.span() / f64::from(self.travel)
    }

    /// Advance the drag state machine with a routed event
    pub(crate) fn step(&mut self, event: &Event) -> DragStep {
        match event.phase() {
            Some(GesturePhase::Press) => {
                let Some(position) = event.position() else {
                    return DragStep::Ignored;
                };
                if self.fsm.send(event_types::POINTER_DOWN) != states::DRAGGING {
                    return DragStep::Ignored;
                }
                self.anchor = Some(DragAnchor {
                    position: self.axis.pick(position),
                    value: self.value,
                });
                DragStep::Started
            }
            Some(GesturePhase::Move) => {
                let (Some(anchor), Some(position)) = (self.anchor, event.position()) else {
                    return DragStep::Ignored;
                };
                let coordinate = self.axis.pick(position);
                let delta = match self.direction {
                    DragDirection::Inverted => anchor.position - coordinate,
                    DragDirection::Direct => coordinate - anchor.position,
                };
                DragStep::Moved(anchor.value + f64::from(delta) * self.sensitivity())
            }
            Some(GesturePhase::Release) => {
                if !self.is_dragging() {
                    return DragStep::Ignored;
                }
                self.fsm.send(event_types::POINTER_UP);
                self.anchor = None;
                DragStep::Ended
            }
            Some(GesturePhase::Click) | None => DragStep::Ignored,
        }
    }
}
