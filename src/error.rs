use thiserror::Error;

use crate::controller::ControllerError;

#[derive(Debug, Error)]
pub enum TriageError {
    #[error("No workflow id supplied. Pass --workflow-id or set WORKFLOW_ID.")]
    MissingWorkflowId,

    #[error("Config error: {0}")]
    Config(String),

    #[error("Controller error: {0}")]
    Controller(#[from] ControllerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
