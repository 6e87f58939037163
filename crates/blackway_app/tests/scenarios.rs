//! Scenario runs against the demo panel and ad hoc panels

use std::fs;
use std::path::PathBuf;

use blackway_app::{
    run_loaded_scenario, run_scenario, PanelConfig, PanelScenario, ReportStatus, RunReport,
};
use blackway_platform::{OutboundMessage, ParamKind};

fn demo(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos").join(file)
}

const SMALL_PANEL: &str = r#"
containers = ["controls", "status"]

[[control]]
widget = "knob"
container = "controls"
param = "detune"
id = "detune"
min = -100
max = 100
value = 0
readout = { id = "detuneValue", suffix = " cents", decimals = 0 }

[[control]]
widget = "switch"
container = "controls"
param = "playNote"
id = "gate"

[[control]]
widget = "led"
container = "status"
param = "playNote"
id = "lamp"
"#;

fn small_panel() -> PanelConfig {
    PanelConfig::from_toml(SMALL_PANEL).unwrap()
}

#[test]
fn demo_scenario_passes() {
    let config = PanelConfig::load(&demo("synth_panel.toml")).unwrap();
    let scenario = PanelScenario::from_path(&demo("play_note.json")).unwrap();

    let outcome = run_loaded_scenario(config, &scenario).unwrap();
    let report = outcome.report();
    assert!(!outcome.is_failed(), "{report:?}");
    assert_eq!(report.steps_run, scenario.steps.len());
    assert_eq!(report.messages_dropped, 0);
    assert_eq!(report.messages.len(), 5);
    assert_eq!(report.messages[3], OutboundMessage::play_note());
}

#[test]
fn failed_assertion_stops_the_run() {
    let outcome = run_scenario(
        small_panel(),
        r#"{"steps": [
            {"type": "set_value", "id": "detune", "value": 20},
            {"type": "assert_value", "id": "detune", "value": 10},
            {"type": "set_value", "id": "detune", "value": 30}
        ]}"#,
    )
    .unwrap();

    assert!(outcome.is_failed());
    let report = outcome.into_report();
    assert_eq!(report.status, ReportStatus::Failed);
    assert_eq!(report.failed_step_index, Some(1));
    assert_eq!(report.assertion.as_deref(), Some("assert_value"));
    assert!(report.message.unwrap().contains("got 20"));
    assert_eq!(report.messages, vec![OutboundMessage::number(ParamKind::Detune, 20.0)]);
}

#[test]
fn touch_drag_moves_knob() {
    let outcome = run_scenario(
        small_panel(),
        r#"{"steps": [
            {"type": "touch_start", "id": "detune", "y": 300},
            {"type": "touch_move", "x": 0, "y": 250},
            {"type": "touch_end"},
            {"type": "assert_value", "id": "detune", "value": 50},
            {"type": "assert_frame", "id": "detune", "frame": 95},
            {"type": "assert_text", "id": "detuneValue", "text": "50 cents"}
        ]}"#,
    )
    .unwrap();
    assert!(!outcome.is_failed(), "{:?}", outcome.report());
    assert_eq!(outcome.report().events_dispatched, 3);
}

#[test]
fn switch_drives_note_and_lamp() {
    let outcome = run_scenario(
        small_panel(),
        r#"{"steps": [
            {"type": "click", "id": "gate"},
            {"type": "assert_state", "id": "lamp", "state": true},
            {"type": "toggle", "id": "gate"},
            {"type": "assert_state", "id": "lamp", "state": false},
            {"type": "assert_sent", "param": "stopNote"},
            {"type": "assert_sent_count", "count": 2}
        ]}"#,
    )
    .unwrap();
    assert!(!outcome.is_failed(), "{:?}", outcome.report());
}

#[test]
fn host_updates_are_not_echoed() {
    let outcome = run_scenario(
        small_panel(),
        r#"{"steps": [
            {"type": "host", "message": {"type": "updateDetune", "value": -40}},
            {"type": "host", "message": "{\"type\":\"updatePlayNote\",\"value\":1}"},
            {"type": "host", "message": {"type": "somethingElse", "value": 1}},
            {"type": "assert_value", "id": "detune", "value": -40},
            {"type": "assert_text", "id": "detuneValue", "text": "-40 cents"},
            {"type": "assert_state", "id": "lamp", "state": true},
            {"type": "assert_sent_count", "count": 0}
        ]}"#,
    )
    .unwrap();
    assert!(!outcome.is_failed(), "{:?}", outcome.report());
}

#[test]
fn destroyed_widget_is_missing() {
    let outcome = run_scenario(
        small_panel(),
        r#"{"steps": [
            {"type": "destroy", "id": "lamp"},
            {"type": "destroy", "id": "lamp"},
            {"type": "assert_missing", "id": "lamp"},
            {"type": "click", "id": "lamp"}
        ]}"#,
    )
    .unwrap();

    let report = outcome.report();
    assert_eq!(report.failed_step_index, Some(3));
    assert_eq!(report.assertion.as_deref(), Some("click"));
}

#[test]
fn pressing_a_passive_widget_fails() {
    let outcome = run_scenario(
        small_panel(),
        r#"{"steps": [{"type": "press", "id": "lamp"}]}"#,
    )
    .unwrap();
    assert!(outcome.report().message.as_deref().unwrap().contains("does not take input"));
}

#[test]
fn report_round_trips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = run_scenario(
        small_panel(),
        r#"{"steps": [{"type": "set_value", "id": "detune", "value": 5}]}"#,
    )
    .unwrap();

    let path = dir.path().join("out/report.json");
    outcome.report().write_to_path(&path).unwrap();
    let report: RunReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert!(report.is_passed());
    assert_eq!(report.messages, vec![OutboundMessage::number(ParamKind::Detune, 5.0)]);
}

#[test]
fn panel_file_errors_carry_context() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "containers = 3").unwrap();

    let err = PanelConfig::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("broken.toml"), "{err:#}");

    let missing = PanelConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(format!("{missing:#}").contains("Failed to read"), "{missing:#}");
}
