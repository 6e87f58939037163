//! Blackway application layer
//!
//! Builds a synth control panel from a TOML description, binds its widgets
//! to host parameters, and runs scripted interaction scenarios headlessly.
//!
//! ```
//! use blackway_app::{run_scenario, PanelConfig};
//!
//! let panel = PanelConfig::from_toml(r#"
//! containers = ["osc"]
//!
//! [[control]]
//! widget = "knob"
//! container = "osc"
//! param = "volume"
//! id = "volume"
//! "#).unwrap();
//!
//! let outcome = run_scenario(panel, r#"{"steps": [
//!     {"type": "set_value", "id": "volume", "value": 80},
//!     {"type": "assert_sent", "param": "volume", "value": 80}
//! ]}"#).unwrap();
//! assert!(!outcome.is_failed());
//! ```

pub mod assertions;
pub mod config;
pub mod panel;
pub mod report;
pub mod runner;
pub mod scenario;

pub use assertions::AssertionResult;
pub use config::{ControlConfig, PanelConfig, ReadoutConfig, WidgetOptions};
pub use panel::SynthPanel;
pub use report::{ReportStatus, RunReport, RunTotals};
pub use runner::{run_loaded_scenario, run_scenario, RunOutcome};
pub use scenario::{PanelScenario, ScenarioStep};
