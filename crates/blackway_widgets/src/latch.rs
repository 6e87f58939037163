//! Two-state image button shared by toggle buttons and switches
//!
//! A click flips the state and notifies; pressing shrinks the button until
//! the pointer is released anywhere.

use blackway_core::document::{Background, BackgroundSize, Document, ElementStyle, ElementTag};
use blackway_core::events::{event_types, Event, GesturePhase};
use blackway_core::fsm::StateMachine;
use blackway_core::ElementId;

use crate::widget::{label_text, Capture, ChangeCallback};
use tracing::warn;

/// Press states
pub mod states {
    pub const IDLE: u32 = 0;
    pub const PRESSED: u32 = 1;
}

/// Scale applied while pressed
pub const PRESSED_SCALE: f32 = 0.95;

/// Resolved on/off image paths
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ImagePair {
    pub on: String,
    pub off: String,
}

impl ImagePair {
    fn pick(&self, state: bool) -> &str {
        if state {
            &self.on
        } else {
            &self.off
        }
    }
}

pub(crate) struct LatchButton {
    pub(crate) id: String,
    pub(crate) button: ElementId,
    images: ImagePair,
    state: bool,
    fsm: StateMachine,
    on_change: Option<ChangeCallback<bool>>,
}

impl LatchButton {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn build(
        document: &mut Document,
        parent: ElementId,
        id: String,
        class: &str,
        min_size: (f32, f32),
        images: ImagePair,
        initial_state: bool,
        label: &Option<String>,
        on_change: Option<ChangeCallback<bool>>,
    ) -> Self {
        let button = document.create_element(ElementTag::Button);
        if !document.set_dom_id(button, &id) {
            warn!(%id, "dom id held by another element");
        }
        if let Some(el) = document.element_mut(button) {
            el.class = Some(class.to_string());
            el.text = label_text(label).map(str::to_string);
            el.style = ElementStyle::new()
                .min_size(min_size.0, min_size.1)
                .background(Background::centered(
                    images.pick(initial_state),
                    BackgroundSize::Cover,
                ))
                .interactive();
        }
        document.append_child(parent, button);

        let fsm = StateMachine::builder(states::IDLE)
            .on(states::IDLE, event_types::POINTER_DOWN, states::PRESSED)
            .on(states::PRESSED, event_types::POINTER_UP, states::IDLE)
            .build();

        Self {
            id,
            button,
            images,
            state: initial_state,
            fsm,
            on_change,
        }
    }

    pub(crate) fn state(&self) -> bool {
        self.state
    }

    pub(crate) fn is_pressed(&self) -> bool {
        self.fsm.is_in(states::PRESSED)
    }

    pub(crate) fn render(&self, document: &mut Document) {
        let scale = if self.is_pressed() { PRESSED_SCALE } else { 1.0 };
        if let Some(style) = document.style_mut(self.button) {
            style.set_background_image(self.images.pick(self.state));
            style.scale = scale;
        }
    }

    pub(crate) fn set_state(&mut self, document: &mut Document, state: bool) {
        self.state = state;
        self.render(document);
    }

    pub(crate) fn toggle(&mut self, document: &mut Document) -> bool {
        self.state = !self.state;
        self.render(document);
        let state = self.state;
        if let Some(callback) = self.on_change.as_mut() {
            callback(state);
        }
        state
    }

    pub(crate) fn handle_event(&mut self, document: &mut Document, event: &Event) -> Capture {
        match event.phase() {
            Some(GesturePhase::Press) => {
                if self.fsm.send(event_types::POINTER_DOWN) != states::PRESSED {
                    return Capture::None;
                }
                self.render(document);
                Capture::Begin
            }
            Some(GesturePhase::Release) => {
                if !self.is_pressed() {
                    return Capture::None;
                }
                self.fsm.send(event_types::POINTER_UP);
                self.render(document);
                Capture::End
            }
            Some(GesturePhase::Click) => {
                self.toggle(document);
                Capture::None
            }
            Some(GesturePhase::Move) | None => Capture::None,
        }
    }
}
