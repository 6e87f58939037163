//! Interaction state machines
//!
//! Flat state machines for widget interaction states. A widget feeds its
//! gesture events in and reads back the state it ended up in; events with no
//! matching transition leave the machine where it is.
//!
//! ```
//! use blackway_core::events::event_types;
//! use blackway_core::fsm::StateMachine;
//!
//! const IDLE: u32 = 0;
//! const DRAGGING: u32 = 1;
//!
//! let mut fsm = StateMachine::builder(IDLE)
//!     .on(IDLE, event_types::POINTER_DOWN, DRAGGING)
//!     .on(DRAGGING, event_types::POINTER_UP, IDLE)
//!     .build();
//!
//! assert_eq!(fsm.send(event_types::POINTER_DOWN), DRAGGING);
//! assert_eq!(fsm.send(event_types::POINTER_DOWN), DRAGGING);
//! assert_eq!(fsm.send(event_types::POINTER_UP), IDLE);
//! ```

use smallvec::SmallVec;

use crate::events::EventType;

/// Identifier for a state within a state machine
pub type StateId = u32;

/// A transition in the state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from_state: StateId,
    pub event: EventType,
    pub to_state: StateId,
}

impl Transition {
    /// Create a transition
    pub fn new(from: StateId, event: EventType, to: StateId) -> Self {
        Self {
            from_state: from,
            event,
            to_state: to,
        }
    }
}

/// Builder for creating state machines
pub struct StateMachineBuilder {
    initial_state: StateId,
    transitions: SmallVec<[Transition; 4]>,
}

impl StateMachineBuilder {
    pub fn new(initial_state: StateId) -> Self {
        Self {
            initial_state,
            transitions: SmallVec::new(),
        }
    }

    /// Add a transition
    pub fn transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add a simple transition (from, event, to)
    pub fn on(mut self, from: StateId, event: EventType, to: StateId) -> Self {
        self.transitions.push(Transition::new(from, event, to));
        self
    }

    /// Build the state machine
    pub fn build(self) -> StateMachine {
        StateMachine {
            initial_state: self.initial_state,
            current_state: self.initial_state,
            transitions: self.transitions,
        }
    }
}

/// A state machine instance
#[derive(Clone, Debug)]
pub struct StateMachine {
    initial_state: StateId,
    current_state: StateId,
    transitions: SmallVec<[Transition; 4]>,
}

impl StateMachine {
    /// Create a builder for a state machine
    pub fn builder(initial_state: StateId) -> StateMachineBuilder {
        StateMachineBuilder::new(initial_state)
    }

    /// Get the current state
    pub fn current_state(&self) -> StateId {
        self.current_state
    }

    /// Check if we're in a specific state
    pub fn is_in(&self, state: StateId) -> bool {
        self.current_state == state
    }

    /// Check if an event can trigger a transition from current state
    pub fn can_send(&self, event: EventType) -> bool {
        self.find(event).is_some()
    }

    /// Send an event, returning the state after any transition
    pub fn send(&mut self, event: EventType) -> StateId {
        if let Some(transition) = self.find(event) {
            self.current_state = transition.to_state;
        }
        self.current_state
    }

    /// Return to the initial state without an event
    pub fn reset(&mut self) {
        self.current_state = self.initial_state;
    }

    fn find(&self, event: EventType) -> Option<Transition> {
        self.transitions
            .iter()
            .find(|t| t.from_state == self.current_state && t.event == event)
            .copied()
    }
}
