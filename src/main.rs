mod analysis;
mod cli;
mod config;
mod controller;
mod error;
mod inspector;
mod logging;
mod stats;
mod ui;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use analysis::{EngineInput, FailureExtractor, JobRegistry, Outcome, WorkflowId};
use cli::{Cli, Command};
use config::TriageConfig;
use controller::{ControllerClient, NodeListing};
use inspector::{WorkflowInspector, load_local_logs};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Inspect {
            workflow_id,
            prior_outcome,
            output,
        } => {
            let workflow_id = parse_workflow_id(workflow_id.as_deref())?;
            let mut config = TriageConfig::load(cli.config.as_deref())?;
            if let Some(max_attempts) = cli.max_attempts {
                config.max_attempts = max_attempts;
            }

            let client = ControllerClient::new(&config)?;
            let inspector = WorkflowInspector::new(client);

            let progress = ui::TriageProgress::start(&format!("Inspecting workflow {workflow_id}"));
            let report = inspector
                .inspect(Some(workflow_id), prior_outcome.as_deref().map(Outcome::from))
                .await;
            progress.finish();

            let report = report?;
            ui::print_report(&report);
            stats::publish(&report, output.as_deref())?;
        }
        Command::Analyze { log_file, name } => {
            let text = std::fs::read_to_string(&log_file)
                .with_context(|| format!("failed to read {}", log_file.display()))?;
            let name = name.unwrap_or_else(|| file_stem(&log_file));
            let analysis = FailureExtractor::analyze(&name, &text);
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        }
        Command::Summarize {
            nodes,
            logs_dir,
            workflow_id,
            prior_outcome,
            output,
        } => {
            let workflow_id = parse_workflow_id(workflow_id.as_deref())?;
            let raw = std::fs::read_to_string(&nodes)
                .with_context(|| format!("failed to read {}", nodes.display()))?;
            let nodes = serde_json::from_str::<NodeListing>(&raw)?.into_nodes();
            let failed_refs = JobRegistry::filter_failed(&nodes);
            let log_text_by_job_id = load_local_logs(&logs_dir, &failed_refs)?;

            let report = analysis::run(EngineInput {
                workflow_id: Some(workflow_id),
                nodes,
                log_text_by_job_id,
                prior_outcome: prior_outcome.as_deref().map(Outcome::from),
            })?;
            ui::print_report(&report);
            stats::publish(&report, output.as_deref())?;
        }
    }

    Ok(())
}

fn parse_workflow_id(raw: Option<&str>) -> Result<WorkflowId, error::TriageError> {
    raw.ok_or(error::TriageError::MissingWorkflowId)?.parse()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "job".to_string())
}
