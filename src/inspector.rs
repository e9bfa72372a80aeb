use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::analysis::{self, EngineInput, FailedJobRef, JobRegistry, Outcome, WorkflowId, WorkflowReport};
use crate::controller::ControllerApi;
use crate::error::TriageError;

/// Pulls a workflow run's nodes and failed-job logs from the controller and hands
/// them to the analysis engine.
pub struct WorkflowInspector<C> {
    client: C,
}

impl<C: ControllerApi> WorkflowInspector<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Inspect one workflow run.
    ///
    /// Aborts before any request when `workflow_id` is missing. A job whose stdout
    /// cannot be fetched is left out of the analyses but still counted as failed.
    pub async fn inspect(
        &self,
        workflow_id: Option<WorkflowId>,
        prior_outcome: Option<Outcome>,
    ) -> Result<WorkflowReport, TriageError> {
        let workflow_id = workflow_id.ok_or(TriageError::MissingWorkflowId)?;

        let nodes = self.client.workflow_nodes(&workflow_id).await?;
        let failed_refs = JobRegistry::filter_failed(&nodes);
        info!(
            %workflow_id,
            nodes = nodes.len(),
            failed = failed_refs.len(),
            "workflow nodes fetched"
        );

        let log_text_by_job_id = self.fetch_logs(&failed_refs).await;

        let report = analysis::run(EngineInput {
            workflow_id: Some(workflow_id),
            nodes,
            log_text_by_job_id,
            prior_outcome,
        })?;
        info!(outcome = %report.summary.final_outcome, "workflow outcome resolved");
        Ok(report)
    }

    /// Fetch stdout once per distinct failed job id.
    async fn fetch_logs(&self, failed_refs: &[FailedJobRef]) -> HashMap<u64, String> {
        let mut logs = HashMap::new();
        for job in failed_refs {
            let Some(job_id) = job.job_id else {
                warn!(job_name = %job.job_name, "failed job has no id, no stdout to fetch");
                continue;
            };
            if logs.contains_key(&job_id) {
                continue;
            }
            match self.client.job_stdout(job_id).await {
                Ok(text) => {
                    logs.insert(job_id, text);
                }
                Err(err) => {
                    warn!(
                        job_id,
                        job_name = %job.job_name,
                        error = %err,
                        "could not fetch job stdout, leaving it out of the analysis"
                    );
                }
            }
        }
        logs
    }
}

/// Read `<dir>/<job_id>.txt` for each distinct failed job. Missing files are skipped.
pub fn load_local_logs(
    dir: &Path,
    failed_refs: &[FailedJobRef],
) -> Result<HashMap<u64, String>, TriageError> {
    let mut logs = HashMap::new();
    for job_id in failed_refs.iter().filter_map(|job| job.job_id) {
        if logs.contains_key(&job_id) {
            continue;
        }
        let path = dir.join(format!("{job_id}.txt"));
        if !path.is_file() {
            debug!(job_id, path = %path.display(), "no local log file");
            continue;
        }
        logs.insert(job_id, std::fs::read_to_string(&path)?);
    }
    Ok(logs)
}
