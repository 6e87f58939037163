//! Scenario runner driving a panel against an in-process host.

use crate::assertions::{
    evaluate_assert_frame, evaluate_assert_missing, evaluate_assert_sent,
    evaluate_assert_sent_count, evaluate_assert_state, evaluate_assert_text,
    evaluate_assert_value, AssertionResult,
};
use crate::config::PanelConfig;
use crate::panel::SynthPanel;
use crate::report::{RunReport, RunTotals};
use crate::scenario::{PanelScenario, ScenarioStep};
use anyhow::Result;
use blackway_core::{ElementId, Event};
use blackway_platform::{HostBridge, RecordingTransport};
use tracing::{debug, info};

/// Final outcome of a scenario run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Passed { report: RunReport },
    Failed { report: RunReport },
}

impl RunOutcome {
    pub fn report(&self) -> &RunReport {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn into_report(self) -> RunReport {
        match self {
            RunOutcome::Passed { report } | RunOutcome::Failed { report } => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Build the panel and run scenario JSON against it.
pub fn run_scenario(config: PanelConfig, input: &str) -> Result<RunOutcome> {
    let scenario = PanelScenario::from_json(input)?;
    run_loaded_scenario(config, &scenario)
}

/// Build the panel and run a pre-loaded scenario; stops at the first
/// failing step.
pub fn run_loaded_scenario(config: PanelConfig, scenario: &PanelScenario) -> Result<RunOutcome> {
    let recorder = RecordingTransport::new();
    let mut panel = SynthPanel::build(config, HostBridge::new(recorder.clone()))?;

    for (step_index, step) in scenario.steps.iter().enumerate() {
        debug!(step_index, step = step.name(), "scenario step");
        if let AssertionResult::Failed { code, message } = execute(&mut panel, &recorder, step) {
            info!(step_index, %code, "scenario failed");
            let totals = totals(&panel, &recorder, step_index);
            let report = RunReport::failed(step.name(), step_index, message, totals);
            return Ok(RunOutcome::Failed { report });
        }
    }

    info!(steps = scenario.steps.len(), "scenario passed");
    Ok(RunOutcome::Passed {
        report: RunReport::passed(totals(&panel, &recorder, scenario.steps.len())),
    })
}

fn totals(panel: &SynthPanel, recorder: &RecordingTransport, steps_run: usize) -> RunTotals {
    RunTotals {
        steps_run,
        events_dispatched: panel.events_dispatched(),
        messages_dropped: panel.stats().dropped,
        messages: recorder.messages(),
    }
}

fn unknown(id: &str) -> AssertionResult {
    AssertionResult::Failed {
        code: "missing_widget".to_string(),
        message: format!("{id}: widget not found"),
    }
}

fn hit_target(panel: &SynthPanel, id: &str) -> Result<ElementId, AssertionResult> {
    let widget = panel.toolkit().get(id).ok_or_else(|| unknown(id))?;
    widget.hit_target().ok_or_else(|| AssertionResult::Failed {
        code: "not_interactive".to_string(),
        message: format!("{id}: widget does not take input"),
    })
}

fn press(
    panel: &mut SynthPanel,
    id: &str,
    make: impl FnOnce(ElementId) -> Event,
) -> AssertionResult {
    match hit_target(panel, id) {
        Ok(target) => {
            panel.dispatch(&make(target));
            AssertionResult::Passed
        }
        Err(failure) => failure,
    }
}

fn execute(
    panel: &mut SynthPanel,
    recorder: &RecordingTransport,
    step: &ScenarioStep,
) -> AssertionResult {
    match step {
        ScenarioStep::Press { id, x, y } => press(panel, id, |t| Event::pointer_down(t, *x, *y)),
        ScenarioStep::Move { x, y } => {
            panel.dispatch(&Event::pointer_move(*x, *y));
            AssertionResult::Passed
        }
        ScenarioStep::Release { x, y } => {
            panel.dispatch(&Event::pointer_up(*x, *y));
            AssertionResult::Passed
        }
        ScenarioStep::Click { id } => press(panel, id, Event::click),
        ScenarioStep::TouchStart { id, x, y } => {
            press(panel, id, |t| Event::touch_start(t, *x, *y))
        }
        ScenarioStep::TouchMove { x, y } => {
            panel.dispatch(&Event::touch_move(*x, *y));
            AssertionResult::Passed
        }
        ScenarioStep::TouchEnd => {
            panel.dispatch(&Event::touch_end());
            AssertionResult::Passed
        }
        ScenarioStep::Drag { id, dx, dy } => {
            let pressed = press(panel, id, |t| Event::pointer_down(t, 0.0, 0.0));
            if pressed.is_passed() {
                panel.dispatch(&Event::pointer_move(*dx, *dy));
                panel.dispatch(&Event::pointer_up(*dx, *dy));
            }
            pressed
        }
        ScenarioStep::Host { message } => {
            let raw = match message {
                serde_json::Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            panel.apply_host_message(&raw);
            AssertionResult::Passed
        }
        ScenarioStep::SetValue { id, value } => {
            if panel.set_value(id, *value) {
                AssertionResult::Passed
            } else {
                unknown(id)
            }
        }
        ScenarioStep::Toggle { id } => match panel.toggle(id) {
            Some(_) => AssertionResult::Passed,
            None => unknown(id),
        },
        ScenarioStep::Choose { param, value } => match panel.send_choice(*param, value) {
            Ok(()) => AssertionResult::Passed,
            Err(e) => AssertionResult::Failed {
                code: "not_choice".to_string(),
                message: e.to_string(),
            },
        },
        ScenarioStep::Destroy { id } => {
            panel.destroy(id);
            AssertionResult::Passed
        }
        ScenarioStep::AssertValue {
            id,
            value,
            tolerance,
        } => evaluate_assert_value(panel.toolkit(), id, *value, *tolerance),
        ScenarioStep::AssertFrame { id, frame } => {
            evaluate_assert_frame(panel.toolkit(), id, *frame)
        }
        ScenarioStep::AssertState { id, state } => {
            evaluate_assert_state(panel.toolkit(), id, *state)
        }
        ScenarioStep::AssertMissing { id } => evaluate_assert_missing(panel.toolkit(), id),
        ScenarioStep::AssertText { id, text } => {
            evaluate_assert_text(panel.toolkit().document(), id, text)
        }
        ScenarioStep::AssertSent { param, value } => {
            evaluate_assert_sent(&recorder.messages(), *param, value.as_ref())
        }
        ScenarioStep::AssertSentCount { count } => {
            evaluate_assert_sent_count(&recorder.messages(), *count)
        }
    }
}
