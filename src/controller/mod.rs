pub mod client;
pub mod error;
pub mod types;

pub use client::ControllerClient;
pub use error::ControllerError;
pub use types::NodeListing;

use crate::analysis::{NodeDescriptor, WorkflowId};

/// The controller queries the inspector depends on.
pub trait ControllerApi {
    /// Every node of the workflow run, across all pages, in controller order.
    async fn workflow_nodes(
        &self,
        workflow_id: &WorkflowId,
    ) -> Result<Vec<NodeDescriptor>, ControllerError>;

    /// Plain-text stdout of one job.
    async fn job_stdout(&self, job_id: u64) -> Result<String, ControllerError>;
}
