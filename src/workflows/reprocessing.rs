//! Reprocessing workflows (§4.5): `ReprocessingBatch` is the public
//! entry point a cron schedule starts; it immediately delegates to
//! `ReprocessingOrchestration`, which pages through the DLQ in bounded
//! continuations rather than holding its whole scan in one history.

use serde::{Deserialize, Serialize};

use crate::activities::reprocessing::{
    self, ProcessFailedWorkflowOutput, QueryFailedWorkflowsInput,
};
use crate::config::WarehouseConfig;
use crate::constants::MAX_WORKFLOWS_PER_CONTINUATION;
use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::types::failure::{FailedWorkflowInfo, FailureStatus, ReprocessingResult};

const REPROCESSABLE_STATUSES: [FailureStatus; 2] = [FailureStatus::WaveTimeout, FailureStatus::PickTimeout];

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReprocessingBatchInput {
    pub max_orders: Option<u32>,
}

/// Result of one bounded page of the DLQ sweep (§8 "bounded continuation
/// depth"). A full page means more entries may remain, so the workflow
/// hands back a continuation request carrying the accumulator instead
/// of looping in place — the runtime is expected to restart the logical
/// workflow with fresh event history and this accumulator preserved,
/// the same way `ContinuousOptimization`'s indefinite loop is explicitly
/// *not* modeled here (§9).
#[derive(Debug, Clone, PartialEq)]
pub enum ReprocessingOutcome {
    Done(ReprocessingResult),
    Continue(ReprocessingResult),
}

impl ReprocessingOutcome {
    pub fn into_result(self) -> ReprocessingResult {
        match self {
            ReprocessingOutcome::Done(r) | ReprocessingOutcome::Continue(r) => r,
        }
    }
}

#[tracing::instrument(skip_all)]
pub async fn orchestrate_reprocessing_batch<C: WorkflowContext>(
    ctx: &C,
    input: ReprocessingBatchInput,
    config: &WarehouseConfig,
) -> ReprocessingResult {
    let batch_size = input.max_orders.unwrap_or(config.reprocessing.default_batch_size);
    let mut accumulated = ReprocessingResult::default();
    loop {
        match orchestrate_reprocessing(ctx, batch_size, accumulated.clone(), config).await {
            ReprocessingOutcome::Done(total) => return total,
            ReprocessingOutcome::Continue(total) => {
                tracing::info!(scanned = total.scanned, "DLQ page full, continuing under fresh history");
                accumulated = total;
            }
        }
    }
}

/// Runs a single bounded page of the DLQ sweep, merging it into the
/// accumulator carried in from a prior continuation (§4.5 step 4). Never
/// loops internally: a full page is reported back as
/// [`ReprocessingOutcome::Continue`] rather than queried again in the
/// same call.
#[tracing::instrument(skip_all)]
pub async fn orchestrate_reprocessing<C: WorkflowContext>(
    ctx: &C,
    batch_size: u32,
    accumulated: ReprocessingResult,
    config: &WarehouseConfig,
) -> ReprocessingOutcome {
    let options = ActivityOptions::from_config(config);
    let limit = batch_size.min(config.reprocessing.max_workflows_per_continuation).min(MAX_WORKFLOWS_PER_CONTINUATION);
    let mut total = accumulated;

    let found = match reprocessing::query_failed_workflows(
        ctx,
        QueryFailedWorkflowsInput {
            failure_statuses: REPROCESSABLE_STATUSES.to_vec(),
            max_retries: config.reprocessing.max_retries,
            limit,
        },
        &options,
    )
    .await
    {
        Ok(out) => out.found,
        Err(e) => {
            tracing::error!(error = %e, "QueryFailedWorkflows failed, ending sweep");
            return ReprocessingOutcome::Done(total);
        }
    };

    let page_count = found.len() as u32;
    let mut page = ReprocessingResult::default();
    for info in found {
        page.scanned += 1;
        process_one(ctx, info, &options, &mut page).await;
    }
    total.merge(&page);

    if page_count == limit {
        ReprocessingOutcome::Continue(total)
    } else {
        ReprocessingOutcome::Done(total)
    }
}

async fn process_one<C: WorkflowContext>(
    ctx: &C,
    info: FailedWorkflowInfo,
    options: &ActivityOptions,
    page: &mut ReprocessingResult,
) {
    if !info.status.is_reprocessable() {
        page.skipped_not_reprocessable += 1;
        return;
    }

    let attempt = info.attempt;
    let order_id = info.order_id.clone();
    match reprocessing::process_failed_workflow(ctx, info, options).await {
        Ok(ProcessFailedWorkflowOutput { restarted, moved_to_dlq, error, .. }) => {
            if restarted {
                page.reprocessed += 1;
            } else if moved_to_dlq {
                page.still_failing += 1;
            }
            if let Some(e) = error {
                tracing::warn!(%order_id, attempt, error = %e, "ProcessFailedWorkflow reported an error");
            }
        }
        Err(e) => {
            tracing::warn!(%order_id, attempt, error = %e, "ProcessFailedWorkflow activity failed");
            page.still_failing += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_context::TestWorkflowContext;
    use crate::types::ids::{OrderId, WorkflowId};
    use chrono::Utc;

    fn entry(id: &str, status: FailureStatus, attempt: u32) -> FailedWorkflowInfo {
        FailedWorkflowInfo {
            workflow_id: WorkflowId::new(id),
            order_id: OrderId::new(id),
            wave_id: None,
            status,
            failed_at: Utc::now(),
            attempt,
            detail: "timed out".to_string(),
        }
    }

    #[tokio::test]
    async fn reprocessable_entries_are_restarted_and_non_reprocessable_skipped() {
        let ctx = TestWorkflowContext::new();
        ctx.stub_activity(
            "QueryFailedWorkflows",
            reprocessing::QueryFailedWorkflowsOutput {
                found: vec![
                    entry("ORD-1", FailureStatus::WaveTimeout, 0),
                    entry("ORD-2", FailureStatus::ShortageUnresolved, 0),
                ],
            },
        );
        ctx.stub_activity(
            "ProcessFailedWorkflow",
            ProcessFailedWorkflowOutput { restarted: true, moved_to_dlq: false, new_workflow_id: None, error: None },
        );

        let outcome = orchestrate_reprocessing(&ctx, 100, ReprocessingResult::default(), &WarehouseConfig::for_test()).await;
        assert!(matches!(outcome, ReprocessingOutcome::Done(_)));
        let result = outcome.into_result();

        assert_eq!(result.scanned, 2);
        assert_eq!(result.reprocessed, 1);
        assert_eq!(result.skipped_not_reprocessable, 1);
        assert_eq!(ctx.call_count("ProcessFailedWorkflow"), 1);
    }

    #[tokio::test]
    async fn exhausted_retries_move_to_dlq() {
        let ctx = TestWorkflowContext::new();
        ctx.stub_activity(
            "QueryFailedWorkflows",
            reprocessing::QueryFailedWorkflowsOutput { found: vec![entry("ORD-3", FailureStatus::PickTimeout, 3)] },
        );
        ctx.stub_activity(
            "ProcessFailedWorkflow",
            ProcessFailedWorkflowOutput { restarted: false, moved_to_dlq: true, new_workflow_id: None, error: None },
        );

        let outcome = orchestrate_reprocessing(&ctx, 100, ReprocessingResult::default(), &WarehouseConfig::for_test()).await;
        let result = outcome.into_result();

        assert_eq!(result.reprocessed, 0);
        assert_eq!(result.still_failing, 1);
    }

    #[tokio::test]
    async fn full_page_requests_continuation_instead_of_looping() {
        let ctx = TestWorkflowContext::new();
        ctx.stub_activity(
            "QueryFailedWorkflows",
            reprocessing::QueryFailedWorkflowsOutput { found: vec![entry("ORD-1", FailureStatus::WaveTimeout, 0)] },
        );
        ctx.stub_activity(
            "ProcessFailedWorkflow",
            ProcessFailedWorkflowOutput { restarted: true, moved_to_dlq: false, new_workflow_id: None, error: None },
        );

        let outcome = orchestrate_reprocessing(&ctx, 1, ReprocessingResult::default(), &WarehouseConfig::for_test()).await;

        assert_eq!(ctx.call_count("QueryFailedWorkflows"), 1);
        match outcome {
            ReprocessingOutcome::Continue(result) => assert_eq!(result.scanned, 1),
            ReprocessingOutcome::Done(_) => panic!("expected a continuation request for a full page"),
        }
    }

    #[tokio::test]
    async fn batch_entry_point_drives_continuations_to_completion() {
        let ctx = TestWorkflowContext::new();
        ctx.stub_activity(
            "QueryFailedWorkflows",
            reprocessing::QueryFailedWorkflowsOutput { found: vec![entry("ORD-1", FailureStatus::WaveTimeout, 0)] },
        );
        ctx.stub_activity("QueryFailedWorkflows", reprocessing::QueryFailedWorkflowsOutput { found: vec![] });
        ctx.stub_activity(
            "ProcessFailedWorkflow",
            ProcessFailedWorkflowOutput { restarted: true, moved_to_dlq: false, new_workflow_id: None, error: None },
        );

        let result =
            orchestrate_reprocessing_batch(&ctx, ReprocessingBatchInput { max_orders: Some(1) }, &WarehouseConfig::for_test())
                .await;

        assert_eq!(result.scanned, 1);
        assert_eq!(ctx.call_count("QueryFailedWorkflows"), 2);
    }
}
