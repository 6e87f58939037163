//! Scripted interaction scenarios for headless panel runs.

use anyhow::{Context, Result};
use blackway_platform::{MessageValue, ParamKind};
use serde::Deserialize;
use std::path::Path;

/// Sequence of panel interaction steps.
#[derive(Debug, Clone, Deserialize)]
pub struct PanelScenario {
    pub steps: Vec<ScenarioStep>,
}

impl PanelScenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

fn default_tolerance() -> f64 {
    1e-6
}

/// One scripted action or check. Widgets are addressed by id; pointer
/// coordinates are in pixels.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    Press {
        id: String,
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
    },
    Move {
        x: f32,
        y: f32,
    },
    Release {
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
    },
    Click {
        id: String,
    },
    TouchStart {
        id: String,
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
    },
    TouchMove {
        x: f32,
        y: f32,
    },
    TouchEnd,
    /// Press at the origin, move by (`dx`, `dy`), release
    Drag {
        id: String,
        #[serde(default)]
        dx: f32,
        #[serde(default)]
        dy: f32,
    },
    /// Inbound host message; either a JSON object or its text
    Host {
        message: serde_json::Value,
    },
    SetValue {
        id: String,
        value: f64,
    },
    Toggle {
        id: String,
    },
    Choose {
        param: ParamKind,
        value: String,
    },
    Destroy {
        id: String,
    },
    AssertValue {
        id: String,
        value: f64,
        #[serde(default = "default_tolerance")]
        tolerance: f64,
    },
    AssertFrame {
        id: String,
        frame: u32,
    },
    AssertState {
        id: String,
        state: bool,
    },
    AssertMissing {
        id: String,
    },
    /// Text of the element with DOM id `id`, such as a readout
    AssertText {
        id: String,
        text: String,
    },
    /// The most recent message of `param` carried `value`
    AssertSent {
        param: ParamKind,
        #[serde(default)]
        value: Option<MessageValue>,
    },
    AssertSentCount {
        count: usize,
    },
}

impl ScenarioStep {
    /// Step type as written in scenario files
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioStep::Press { .. } => "press",
            ScenarioStep::Move { .. } => "move",
            ScenarioStep::Release { .. } => "release",
            ScenarioStep::Click { .. } => "click",
            ScenarioStep::TouchStart { .. } => "touch_start",
            ScenarioStep::TouchMove { .. } => "touch_move",
            ScenarioStep::TouchEnd => "touch_end",
            ScenarioStep::Drag { .. } => "drag",
            ScenarioStep::Host { .. } => "host",
            ScenarioStep::SetValue { .. } => "set_value",
            ScenarioStep::Toggle { .. } => "toggle",
            ScenarioStep::Choose { .. } => "choose",
            ScenarioStep::Destroy { .. } => "destroy",
            ScenarioStep::AssertValue { .. } => "assert_value",
            ScenarioStep::AssertFrame { .. } => "assert_frame",
            ScenarioStep::AssertState { .. } => "assert_state",
            ScenarioStep::AssertMissing { .. } => "assert_missing",
            ScenarioStep::AssertText { .. } => "assert_text",
            ScenarioStep::AssertSent { .. } => "assert_sent",
            ScenarioStep::AssertSentCount { .. } => "assert_sent_count",
        }
    }

    pub fn is_assertion(&self) -> bool {
        self.name().starts_with("assert_")
    }
}
