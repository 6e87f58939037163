//! Panel configuration file handling
//!
//! A panel file is TOML:
//!
//! ```toml
//! containers = ["oscillator", "status"]
//!
//! [toolkit]
//! assetRoot = "Assets"
//!
//! [[control]]
//! widget = "knob"
//! container = "oscillator"
//! param = "volume"
//! id = "volume"
//! max = 1.0
//! value = 0.7
//! ```
//!
//! Each `[[control]]` names its widget kind, the container it goes in, an
//! optional host parameter, and the widget's own options. Knobs and sliders
//! may add a `readout = { id = "volumeValue", suffix = "%" }` text element
//! that shows their current value.

use anyhow::{bail, Context, Result};
use blackway_platform::ParamKind;
use blackway_widgets::{
    KnobConfig, LedConfig, SliderConfig, SwitchConfig, ToggleButtonConfig, ToolkitConfig,
    WidgetKind,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Top-level panel configuration
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub toolkit: ToolkitConfig,
    /// DOM ids of the containers controls are placed in
    pub containers: Vec<String>,
    #[serde(rename = "control")]
    pub controls: Vec<ControlConfig>,
}

/// One control on the panel
#[derive(Debug, Deserialize)]
pub struct ControlConfig {
    /// Container DOM id
    pub container: String,
    /// Host parameter the control drives or mirrors
    #[serde(default)]
    pub param: Option<ParamKind>,
    /// Value display placed after the control
    #[serde(default)]
    pub readout: Option<ReadoutConfig>,
    #[serde(flatten)]
    pub widget: WidgetOptions,
}

/// Text element mirroring a knob or slider value
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReadoutConfig {
    /// DOM id of the readout element
    pub id: String,
    /// Unit appended to the number, such as `" Hz"`
    #[serde(default)]
    pub suffix: String,
    /// Fixed decimal places; shortest form when unset
    #[serde(default)]
    pub decimals: Option<usize>,
}

impl ReadoutConfig {
    /// Readout text for `value`
    pub fn format(&self, value: f64) -> String {
        match self.decimals {
            Some(places) => format!("{value:.places$}{}", self.suffix),
            None => format!("{value}{}", self.suffix),
        }
    }
}

/// Widget kind and its options
#[derive(Debug, Deserialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum WidgetOptions {
    Knob(KnobConfig),
    Slider(SliderConfig),
    ToggleButton(ToggleButtonConfig),
    Switch(SwitchConfig),
    Led(LedConfig),
}

impl WidgetOptions {
    pub fn kind(&self) -> WidgetKind {
        match self {
            WidgetOptions::Knob(_) => WidgetKind::Knob,
            WidgetOptions::Slider(_) => WidgetKind::Slider,
            WidgetOptions::ToggleButton(_) => WidgetKind::ToggleButton,
            WidgetOptions::Switch(_) => WidgetKind::Switch,
            WidgetOptions::Led(_) => WidgetKind::Led,
        }
    }
}

impl PanelConfig {
    /// Parse and validate panel TOML
    pub fn from_toml(input: &str) -> Result<Self> {
        let config: PanelConfig = toml::from_str(input).context("Failed to parse panel config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a panel file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid panel {}", path.display()))
    }

    /// Check container names, readouts and parameter bindings
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for container in &self.containers {
            if !seen.insert(container.as_str()) {
                bail!("container `{container}` is declared twice");
            }
        }

        for (index, control) in self.controls.iter().enumerate() {
            let kind = control.widget.kind();
            if control.readout.is_some() && !matches!(kind, WidgetKind::Knob | WidgetKind::Slider)
            {
                bail!("control #{index}: a {kind:?} has no value to read out");
            }
            let Some(param) = control.param else {
                continue;
            };
            if !binding_supported(kind, param) {
                bail!("control #{index}: a {kind:?} cannot be bound to `{param}`");
            }
        }
        Ok(())
    }
}

/// Which parameters each widget kind can carry
fn binding_supported(kind: WidgetKind, param: ParamKind) -> bool {
    if param.is_choice() {
        return false;
    }
    match kind {
        WidgetKind::Knob | WidgetKind::Slider => !param.is_trigger(),
        WidgetKind::ToggleButton | WidgetKind::Switch | WidgetKind::Led => true,
    }
}
