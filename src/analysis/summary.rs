use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use super::WorkflowId;
use super::extractor::JobAnalysis;
use super::outcome::Outcome;
use super::registry::FailedJobRef;

pub const NO_FAILED_JOBS: &str = "No failed jobs found";

/// Per-job analyses keyed by job id, in first-seen order.
///
/// Inserting an id that is already present replaces its analysis in place: the entry keeps
/// the position of its first appearance and the value of its last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailedJobs {
    entries: Vec<(u64, JobAnalysis)>,
}

impl FailedJobs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new collection with `analysis` recorded under `job_id`.
    pub fn with(mut self, job_id: u64, analysis: JobAnalysis) -> Self {
        match self.entries.iter_mut().find(|(id, _)| *id == job_id) {
            Some((_, existing)) => *existing = analysis,
            None => self.entries.push((job_id, analysis)),
        }
        self
    }

    #[allow(dead_code)]
    pub fn get(&self, job_id: u64) -> Option<&JobAnalysis> {
        self.entries
            .iter()
            .find(|(id, _)| *id == job_id)
            .map(|(_, analysis)| analysis)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &JobAnalysis)> {
        self.entries.iter().map(|(id, analysis)| (*id, analysis))
    }

    pub fn analyses(&self) -> impl Iterator<Item = &JobAnalysis> {
        self.entries.iter().map(|(_, analysis)| analysis)
    }
}

impl FromIterator<(u64, JobAnalysis)> for FailedJobs {
    fn from_iter<I: IntoIterator<Item = (u64, JobAnalysis)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(FailedJobs::new(), |jobs, (id, analysis)| jobs.with(id, analysis))
    }
}

impl Serialize for FailedJobs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, analysis) in &self.entries {
            map.serialize_entry(id, analysis)?;
        }
        map.end()
    }
}

/// Workflow-level failure report, serialized as `workflow_failures_summary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowSummary {
    pub workflow_id: WorkflowId,
    /// Number of failed nodes, which can exceed `failed_jobs.len()` when logs were
    /// unavailable or a job id repeated.
    pub failed_jobs_count: usize,
    pub failed_jobs: FailedJobs,
    #[serde(rename = "final_wt_outcome")]
    pub final_outcome: Outcome,
}

/// A [`WorkflowSummary`] together with its derived projections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowReport {
    pub summary: WorkflowSummary,
    pub all_failed_hosts: Vec<String>,
    pub failure_reason: String,
}

pub struct SummaryAggregator;

impl SummaryAggregator {
    pub fn aggregate(
        workflow_id: WorkflowId,
        failed_refs: &[FailedJobRef],
        analyses: FailedJobs,
        outcome: Outcome,
    ) -> WorkflowReport {
        let all_failed_hosts = Self::all_failed_hosts(&analyses);
        let failure_reason = Self::failure_reason(failed_refs, &analyses);

        WorkflowReport {
            summary: WorkflowSummary {
                workflow_id,
                failed_jobs_count: failed_refs.len(),
                failed_jobs: analyses,
                final_outcome: outcome,
            },
            all_failed_hosts,
            failure_reason,
        }
    }

    /// Union of every analysis' failed hosts, in order of first sighting.
    fn all_failed_hosts(analyses: &FailedJobs) -> Vec<String> {
        analyses
            .analyses()
            .flat_map(|analysis| analysis.failed_hosts.iter())
            .fold(Vec::new(), |mut hosts: Vec<String>, host| {
                if !hosts.contains(host) {
                    hosts.push(host.clone());
                }
                hosts
            })
    }

    fn failure_reason(failed_refs: &[FailedJobRef], analyses: &FailedJobs) -> String {
        if let Some(first) = analyses.analyses().next() {
            return first.final_error.clone();
        }
        if failed_refs.is_empty() {
            return NO_FAILED_JOBS.to_string();
        }

        let mut names: Vec<&str> = Vec::new();
        for job in failed_refs {
            if !names.contains(&job.job_name.as_str()) {
                names.push(&job.job_name);
            }
        }
        format!(
            "Failed job(s) without retrievable logs: {}",
            names.join(", ")
        )
    }
}
