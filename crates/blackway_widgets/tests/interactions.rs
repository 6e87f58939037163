//! End-to-end widget behaviour through the toolkit's event routing

use std::cell::RefCell;
use std::rc::Rc;

use blackway_core::Event;
use blackway_widgets::{
    KnobConfig, LedConfig, Orientation, SliderConfig, SwitchConfig, ToggleButtonConfig, Toolkit,
    WidgetError, WidgetKind,
};

fn panel() -> Toolkit {
    let mut toolkit = Toolkit::default();
    toolkit.document_mut().create_container("controls");
    toolkit.document_mut().create_container("status");
    toolkit
}

fn recorder<T: 'static>() -> (Rc<RefCell<Vec<T>>>, impl FnMut(T) + 'static) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    (log, move |v| sink.borrow_mut().push(v))
}

fn drag(toolkit: &mut Toolkit, id: &str, from: (f32, f32), to: (f32, f32)) {
    let target = toolkit.get(id).unwrap().hit_target().unwrap();
    toolkit.dispatch(&Event::pointer_down(target, from.0, from.1));
    toolkit.dispatch(&Event::pointer_move(to.0, to.1));
    toolkit.dispatch(&Event::pointer_up(to.0, to.1));
}

#[test]
fn knob_dragged_up_fifty_pixels_reaches_75() {
    let (log, on_change) = recorder::<f64>();
    let mut toolkit = panel();
    let id = toolkit
        .create_knob("controls", KnobConfig::new().id("volume").on_change(on_change))
        .unwrap();

    drag(&mut toolkit, &id, (40.0, 200.0), (40.0, 150.0));

    assert_eq!(toolkit.value_of("volume"), Some(75.0));
    assert_eq!(toolkit.frame_of("volume"), Some(95));
    assert_eq!(*log.borrow(), vec![75.0]);
}

#[test]
fn knob_drag_clamps_at_range_ends() {
    let mut toolkit = panel();
    let id = toolkit.create_knob("controls", KnobConfig::new()).unwrap();

    drag(&mut toolkit, &id, (0.0, 500.0), (0.0, -500.0));
    assert_eq!(toolkit.value_of(&id), Some(100.0));
    assert_eq!(toolkit.frame_of(&id), Some(127));

    drag(&mut toolkit, &id, (0.0, 0.0), (0.0, 1000.0));
    assert_eq!(toolkit.value_of(&id), Some(0.0));
    assert_eq!(toolkit.frame_of(&id), Some(0));
}

#[test]
fn horizontal_slider_follows_pointer() {
    let mut toolkit = panel();
    let id = toolkit.create_slider("controls", SliderConfig::new()).unwrap();

    drag(&mut toolkit, &id, (100.0, 10.0), (150.0, 10.0));
    assert_eq!(toolkit.value_of(&id), Some(75.0));

    toolkit.slider(&id).unwrap().set_value(50.0);
    drag(&mut toolkit, &id, (100.0, 10.0), (50.0, 10.0));
    assert_eq!(toolkit.value_of(&id), Some(25.0));
    assert_eq!(toolkit.frame_of(&id), Some(31));
}

#[test]
fn vertical_slider_uses_y_axis() {
    let mut toolkit = panel();
    let id = toolkit
        .create_slider(
            "controls",
            SliderConfig::new()
                .orientation(Orientation::Vertical)
                .range(-1.0, 1.0)
                .value(0.0),
        )
        .unwrap();

    drag(&mut toolkit, &id, (5.0, 100.0), (300.0, 100.0));
    assert_eq!(toolkit.value_of(&id), Some(0.0));

    drag(&mut toolkit, &id, (5.0, 100.0), (5.0, 150.0));
    assert_eq!(toolkit.value_of(&id), Some(0.5));
}

#[test]
fn drag_travel_override_changes_sensitivity() {
    let mut toolkit = panel();
    let id = toolkit
        .create_knob("controls", KnobConfig::new().drag_travel(100.0))
        .unwrap();

    drag(&mut toolkit, &id, (0.0, 100.0), (0.0, 80.0));
    assert_eq!(toolkit.value_of(&id), Some(70.0));
}

#[test]
fn every_move_repaints_and_notifies() {
    let (log, on_change) = recorder::<f64>();
    let mut toolkit = panel();
    let id = toolkit
        .create_slider("controls", SliderConfig::new().on_change(on_change))
        .unwrap();
    let target = toolkit.get(&id).unwrap().hit_target().unwrap();

    toolkit.dispatch(&Event::pointer_down(target, 0.0, 0.0));
    for x in [10.0, 20.0, 30.0] {
        toolkit.dispatch(&Event::pointer_move(x, 0.0));
    }
    toolkit.dispatch(&Event::pointer_up(30.0, 0.0));
    toolkit.dispatch(&Event::pointer_move(200.0, 0.0));

    assert_eq!(*log.borrow(), vec![55.0, 60.0, 65.0]);
}

#[test]
fn set_value_is_idempotent_at_the_bound() {
    let (log, on_change) = recorder::<f64>();
    let mut toolkit = panel();
    let id = toolkit
        .create_knob("controls", KnobConfig::new().on_change(on_change))
        .unwrap();

    let mut knob = toolkit.knob(&id).unwrap();
    knob.set_value(150.0);
    let frame = knob.frame();
    knob.set_value(100.0);
    assert_eq!(knob.value(), 100.0);
    assert_eq!(knob.frame(), frame);
    assert_eq!(*log.borrow(), vec![100.0, 100.0]);
}

#[test]
fn toggle_twice_restores_state_and_fires_twice() {
    let (log, on_change) = recorder::<bool>();
    let mut toolkit = panel();
    let id = toolkit
        .create_toggle_button("controls", ToggleButtonConfig::new().on_change(on_change))
        .unwrap();

    let mut button = toolkit.toggle_button(&id).unwrap();
    button.toggle();
    button.toggle();
    assert!(!button.state());
    assert_eq!(*log.borrow(), vec![true, false]);
}

#[test]
fn set_state_never_fires_callbacks() {
    let (log, on_change) = recorder::<bool>();
    let mut toolkit = panel();
    let id = toolkit
        .create_switch("controls", SwitchConfig::new().on_change(on_change))
        .unwrap();

    toolkit.switch(&id).unwrap().set_state(true);
    toolkit.stateful(&id).unwrap().set_state(false);
    assert!(log.borrow().is_empty());

    let target = toolkit.get(&id).unwrap().hit_target().unwrap();
    toolkit.dispatch(&Event::click(target));
    assert_eq!(*log.borrow(), vec![true]);
}

#[test]
fn led_reflects_state_without_input() {
    let mut toolkit = panel();
    let id = toolkit
        .create_led("status", LedConfig::new().id("noteLed").label("Note"))
        .unwrap();
    let root = toolkit.get(&id).unwrap().root();

    assert!(!toolkit.dispatch(&Event::click(root)));
    toolkit.led(&id).unwrap().set_state(true);
    assert_eq!(toolkit.state_of("noteLed"), Some(true));
}

#[test]
fn destroy_then_lookup_is_not_found() {
    let mut toolkit = panel();
    let id = toolkit.create_slider("controls", SliderConfig::new().label("Cutoff")).unwrap();
    assert_eq!(toolkit.kind_of(&id), Some(WidgetKind::Slider));

    assert!(toolkit.destroy(&id));
    assert!(toolkit.get(&id).is_none());
    assert!(toolkit.value_of(&id).is_none());
    assert!(!toolkit.destroy(&id));

    let controls = toolkit.document().get_element_by_id("controls").unwrap();
    assert!(toolkit.document().element(controls).unwrap().children().is_empty());
}

#[test]
fn failed_creation_leaves_no_trace() {
    let mut toolkit = panel();
    let before = toolkit.document().len();

    let err = toolkit
        .create_knob("controls", KnobConfig::new().range(5.0, 1.0))
        .unwrap_err();
    assert!(matches!(err, WidgetError::Core(_)));

    let err = toolkit.create_led("missing", LedConfig::new()).unwrap_err();
    assert_eq!(err.to_string(), "container `missing` not found");

    assert_eq!(toolkit.document().len(), before);
    assert!(toolkit.is_empty());
}
