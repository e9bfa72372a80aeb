use serde::{Deserialize, Serialize};

/// The only job status the registry treats as a failure. Compared verbatim.
pub const FAILED_STATUS: &str = "failed";

/// One node of a workflow run, as returned by the controller's workflow-nodes endpoint.
///
/// Every level of the nested job reference is optional: a node that never spawned a job,
/// or whose job carries no status, is inert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub summary_fields: Option<NodeSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSummary {
    #[serde(default)]
    pub job: Option<JobSummary>,
}

/// The nested job reference carried by a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl NodeDescriptor {
    #[cfg(test)]
    pub fn with_job(id: u64, name: &str, status: &str) -> Self {
        Self {
            id: None,
            summary_fields: Some(NodeSummary {
                job: Some(JobSummary {
                    id: Some(id),
                    name: Some(name.to_string()),
                    status: Some(status.to_string()),
                }),
            }),
        }
    }

    fn job(&self) -> Option<&JobSummary> {
        self.summary_fields.as_ref()?.job.as_ref()
    }
}

/// Minimal reference to a job that ended in the failed state.
///
/// `job_id` is `None` when the controller reported the failure without an id; such a
/// job still counts as failed but has no log to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedJobRef {
    pub job_id: Option<u64>,
    pub job_name: String,
}

/// Filters workflow nodes down to the jobs that failed.
pub struct JobRegistry;

impl JobRegistry {
    /// Return one [`FailedJobRef`] per node whose job status is exactly `"failed"`.
    ///
    /// Input order is preserved and nothing is deduplicated: a job id that appears on two
    /// nodes yields two entries. Nodes without a job or a status are skipped; a failed job
    /// without an id is kept.
    pub fn filter_failed(nodes: &[NodeDescriptor]) -> Vec<FailedJobRef> {
        nodes
            .iter()
            .filter_map(NodeDescriptor::job)
            .filter(|job| job.status.as_deref() == Some(FAILED_STATUS))
            .map(|job| FailedJobRef {
                job_id: job.id,
                job_name: job.name.clone().unwrap_or_default(),
            })
            .collect()
    }
}
