//! Key/value stats published for later workflow steps.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::analysis::{Outcome, WorkflowReport, WorkflowSummary};
use crate::error::TriageError;

#[derive(Debug, Clone, Serialize)]
pub struct StatsReport<'a> {
    pub workflow_failures_summary: &'a WorkflowSummary,
    pub wt_outcome: &'a Outcome,
    #[serde(rename = "_failed_hosts_info")]
    pub failed_hosts_info: &'a [String],
    pub failure_reason: &'a str,
}

impl<'a> From<&'a WorkflowReport> for StatsReport<'a> {
    fn from(report: &'a WorkflowReport) -> Self {
        Self {
            workflow_failures_summary: &report.summary,
            wt_outcome: &report.summary.final_outcome,
            failed_hosts_info: &report.all_failed_hosts,
            failure_reason: &report.failure_reason,
        }
    }
}

/// Write the stats as pretty JSON to `out`.
pub fn write_stats(report: &WorkflowReport, mut out: impl Write) -> Result<(), TriageError> {
    serde_json::to_writer_pretty(&mut out, &StatsReport::from(report))?;
    writeln!(out)?;
    Ok(())
}

/// Publish to `path` when given, otherwise to stdout.
pub fn publish(report: &WorkflowReport, path: Option<&Path>) -> Result<(), TriageError> {
    match path {
        Some(path) => write_stats(report, std::fs::File::create(path)?),
        None => write_stats(report, std::io::stdout().lock()),
    }
}
