//! Blackway CLI
//!
//! - `blackway run <panel.toml> <scenario.json> [--report out.json]` replays
//!   a scenario against the panel and prints the JSON report; the exit code
//!   is non-zero when a step fails
//! - `blackway render <panel.toml>` prints the built element tree with the
//!   inline CSS of every element

use anyhow::{Context, Result};
use blackway_app::{run_loaded_scenario, PanelConfig, PanelScenario, SynthPanel};
use blackway_platform::{HostBridge, RecordingTransport};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Filmstrip control panels, headless
#[derive(Parser, Debug)]
#[command(name = "blackway")]
#[command(about = "Run and inspect filmstrip control panels")]
#[command(version)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a scenario against a panel
    Run {
        /// Panel description (TOML)
        panel: PathBuf,

        /// Scenario steps (JSON)
        scenario: PathBuf,

        /// Also write the report to this file
        #[arg(short, long)]
        report: Option<PathBuf>,
    },
    /// Print the element tree of a panel
    Render {
        /// Panel description (TOML)
        panel: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(io::stderr)
        .init();
}

/// Returns whether every step passed
fn run_command(
    panel: &Path,
    scenario: &Path,
    report_path: Option<&Path>,
    out: &mut impl Write,
) -> Result<bool> {
    let config = PanelConfig::load(panel)?;
    let scenario = PanelScenario::from_path(scenario)?;
    info!(panel = %panel.display(), steps = scenario.steps.len(), "running scenario");

    let outcome = run_loaded_scenario(config, &scenario)?;
    let report = outcome.report();
    report.write_to_writer(out)?;
    if let Some(path) = report_path {
        report
            .write_to_path(path)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }
    Ok(!outcome.is_failed())
}

fn render_command(panel: &Path, out: &mut impl Write) -> Result<()> {
    let config = PanelConfig::load(panel)?;
    let panel = SynthPanel::build(config, HostBridge::new(RecordingTransport::new()))?;
    out.write_all(panel.render_tree().as_bytes())?;
    Ok(())
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut stdout = io::stdout().lock();
    match cli.command {
        Command::Run {
            panel,
            scenario,
            report,
        } => {
            let passed = run_command(&panel, &scenario, report.as_deref(), &mut stdout)?;
            Ok(if passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Render { panel } => {
            render_command(&panel, &mut stdout)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;

    fn demo(file: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../demos")
            .join(file)
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::parse_from(["blackway", "-v", "run", "p.toml", "s.json", "--report", "r.json"]);
        assert!(cli.verbose);
        match cli.command {
            Command::Run { report, .. } => assert_eq!(report, Some(PathBuf::from("r.json"))),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_run_demo_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("report.json");
        let mut out = Vec::new();

        let passed = run_command(
            &demo("synth_panel.toml"),
            &demo("play_note.json"),
            Some(&report),
            &mut out,
        )
        .unwrap();

        assert!(passed);
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("\"status\": \"passed\""), "{printed}");
        assert_eq!(fs::read_to_string(&report).unwrap().trim_end(), printed.trim_end());
    }

    #[test]
    fn test_run_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let scenario = dir.path().join("fail.json");
        fs::write(
            &scenario,
            r#"{"steps": [{"type": "assert_value", "id": "volume", "value": 0}]}"#,
        )
        .unwrap();

        let mut out = Vec::new();
        let passed = run_command(&demo("synth_panel.toml"), &scenario, None, &mut out).unwrap();
        assert!(!passed);
        assert!(String::from_utf8(out).unwrap().contains("\"failed\""));
    }

    #[test]
    fn test_render_demo() {
        let mut out = Vec::new();
        render_command(&demo("synth_panel.toml"), &mut out).unwrap();
        let tree = String::from_utf8(out).unwrap();
        assert!(tree.contains("id=\"volume\""), "{tree}");
        assert!(tree.contains("knob_small_black_128_frames.png"), "{tree}");
        assert!(tree.contains("class=\"led\""), "{tree}");
        assert!(
            tree.contains("id=\"frequencyValue\" class=\"value-display\">440 Hz"),
            "{tree}"
        );
    }

    #[test]
    fn test_missing_panel_file() {
        let err = render_command(Path::new("does/not/exist.toml"), &mut Vec::new()).unwrap_err();
        assert!(format!("{err:#}").contains("exist.toml"));
    }
}
