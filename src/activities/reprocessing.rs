//! Reprocessing activities (§4.5).

use serde::{Deserialize, Serialize};

use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::error::ActivityError;
use crate::types::failure::FailedWorkflowInfo;
use crate::types::failure::FailureStatus;
use crate::types::ids::WorkflowId;

#[derive(Debug, Clone, Serialize)]
pub struct QueryFailedWorkflowsInput {
    pub failure_statuses: Vec<FailureStatus>,
    pub max_retries: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryFailedWorkflowsOutput {
    pub found: Vec<FailedWorkflowInfo>,
}

pub async fn query_failed_workflows<C: WorkflowContext>(
    ctx: &C,
    input: QueryFailedWorkflowsInput,
    options: &ActivityOptions,
) -> Result<QueryFailedWorkflowsOutput, ActivityError> {
    ctx.execute_activity("QueryFailedWorkflows", input, options).await
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessFailedWorkflowOutput {
    pub restarted: bool,
    pub moved_to_dlq: bool,
    pub new_workflow_id: Option<WorkflowId>,
    pub error: Option<String>,
}

pub async fn process_failed_workflow<C: WorkflowContext>(
    ctx: &C,
    info: FailedWorkflowInfo,
    options: &ActivityOptions,
) -> Result<ProcessFailedWorkflowOutput, ActivityError> {
    ctx.execute_activity("ProcessFailedWorkflow", info, options).await
}

/// Decision rule inside `ProcessFailedWorkflow` (§4.5): retry while
/// under the ceiling, otherwise move to the DLQ.
pub fn should_restart(attempt: u32, max_retries: u32) -> bool {
    attempt < max_retries
}
