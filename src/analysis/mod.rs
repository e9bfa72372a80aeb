//! Failure extraction and aggregation engine.
//!
//! Each stage is a pure function over already-fetched data:
//! nodes → [`JobRegistry`] → [`FailureExtractor`] per job → [`OutcomeResolver`]
//! → [`SummaryAggregator`].

mod extractor;
mod outcome;
mod registry;
mod summary;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TriageError;

pub use extractor::FailureExtractor;
pub use outcome::{Outcome, OutcomeResolver};
pub use registry::{FailedJobRef, JobRegistry, NodeDescriptor};
pub use summary::{FailedJobs, SummaryAggregator, WorkflowReport, WorkflowSummary};

/// Identifier of a workflow run: the controller's numeric id or an opaque name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorkflowId {
    Numeric(u64),
    Named(String),
}

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowId::Numeric(id) => write!(f, "{id}"),
            WorkflowId::Named(name) => f.write_str(name),
        }
    }
}

impl FromStr for WorkflowId {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TriageError::MissingWorkflowId);
        }
        Ok(match trimmed.parse::<u64>() {
            Ok(id) => WorkflowId::Numeric(id),
            Err(_) => WorkflowId::Named(trimmed.to_string()),
        })
    }
}

/// Everything the engine needs for one run.
#[derive(Debug, Clone, Default)]
pub struct EngineInput {
    pub workflow_id: Option<WorkflowId>,
    pub nodes: Vec<NodeDescriptor>,
    /// Log text for each job whose stdout was retrieved. Absent ids are not analyzed.
    pub log_text_by_job_id: HashMap<u64, String>,
    /// Defaults to [`Outcome::Scheduled`].
    pub prior_outcome: Option<Outcome>,
}

/// Analyze every failed job that has an id and log text, in failed-ref order.
pub fn analyze_failed_jobs(
    failed_refs: &[FailedJobRef],
    log_text_by_job_id: &HashMap<u64, String>,
) -> FailedJobs {
    failed_refs
        .iter()
        .filter_map(|job| {
            let Some(job_id) = job.job_id else {
                debug!(job_name = %job.job_name, "failed job has no id, skipping analysis");
                return None;
            };
            let Some(text) = log_text_by_job_id.get(&job_id) else {
                debug!(job_id, "no log text, skipping analysis");
                return None;
            };
            Some((job_id, FailureExtractor::analyze(&job.job_name, text)))
        })
        .collect()
}

/// Run the whole engine. Fails only when no workflow id was supplied.
pub fn run(input: EngineInput) -> Result<WorkflowReport, TriageError> {
    let workflow_id = input.workflow_id.ok_or(TriageError::MissingWorkflowId)?;

    let failed_refs = JobRegistry::filter_failed(&input.nodes);
    let analyses = analyze_failed_jobs(&failed_refs, &input.log_text_by_job_id);
    let prior = input.prior_outcome.unwrap_or_default();
    let outcome = OutcomeResolver::resolve(&prior, !failed_refs.is_empty());

    debug!(
        %workflow_id,
        failed = failed_refs.len(),
        analyzed = analyses.len(),
        %outcome,
        "engine run complete"
    );

    Ok(SummaryAggregator::aggregate(
        workflow_id,
        &failed_refs,
        analyses,
        outcome,
    ))
}
