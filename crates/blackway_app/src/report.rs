//! Report output model for scenario runs.

use anyhow::{bail, Result};
use blackway_platform::OutboundMessage;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Component, Path};

/// Report status for a scenario run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// Machine-readable result of a scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub status: ReportStatus,
    pub failed_step_index: Option<usize>,
    pub assertion: Option<String>,
    pub message: Option<String>,
    pub steps_run: usize,
    pub events_dispatched: u64,
    pub messages_dropped: u64,
    /// Everything delivered to the host, oldest first
    pub messages: Vec<OutboundMessage>,
}

/// Counters shared by passed and failed reports
#[derive(Debug, Clone, Default)]
pub struct RunTotals {
    pub steps_run: usize,
    pub events_dispatched: u64,
    pub messages_dropped: u64,
    pub messages: Vec<OutboundMessage>,
}

impl RunReport {
    pub fn passed(totals: RunTotals) -> Self {
        Self {
            status: ReportStatus::Passed,
            failed_step_index: None,
            assertion: None,
            message: None,
            steps_run: totals.steps_run,
            events_dispatched: totals.events_dispatched,
            messages_dropped: totals.messages_dropped,
            messages: totals.messages,
        }
    }

    pub fn failed(
        assertion: &str,
        failed_step_index: usize,
        message: String,
        totals: RunTotals,
    ) -> Self {
        Self {
            status: ReportStatus::Failed,
            failed_step_index: Some(failed_step_index),
            assertion: Some(assertion.to_string()),
            message: Some(message),
            ..Self::passed(totals)
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status == ReportStatus::Passed
    }

    /// Write pretty JSON, creating parent directories
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            bail!("report path cannot contain '..'");
        }
        let payload = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, payload)?;
        Ok(())
    }

    pub fn write_to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        let payload = serde_json::to_string_pretty(self)?;
        writer.write_all(payload.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackway_platform::ParamKind;

    fn totals() -> RunTotals {
        RunTotals {
            steps_run: 3,
            events_dispatched: 2,
            messages_dropped: 0,
            messages: vec![OutboundMessage::number(ParamKind::Volume, 0.5)],
        }
    }

    #[test]
    fn test_failed_report_json() {
        let report = RunReport::failed("assert_value", 2, "volume: mismatch".to_string(), totals());
        let mut out = Vec::new();
        report.write_to_writer(&mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(json["status"], "failed");
        assert_eq!(json["failed_step_index"], 2);
        assert_eq!(json["assertion"], "assert_value");
        assert_eq!(json["steps_run"], 3);
        assert_eq!(json["messages"][0]["type"], "volume");
        assert!(!report.is_passed());
    }

    #[test]
    fn test_write_to_path_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports/nested/run.json");
        RunReport::passed(totals()).write_to_path(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let report: RunReport = serde_json::from_str(&raw).unwrap();
        assert!(report.is_passed());
        assert_eq!(report.messages.len(), 1);
    }

    #[test]
    fn test_write_to_path_rejects_parent_dir() {
        let report = RunReport::passed(RunTotals::default());
        assert!(report.write_to_path(Path::new("../escape.json")).is_err());
    }
}
