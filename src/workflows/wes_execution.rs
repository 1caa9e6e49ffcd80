//! WESExecution workflow (§4.3): resolves an execution plan, creates a
//! task route, and drives its stages as child workflows (or, for
//! walling, an activity plus a signal wait) on dedicated task queues.

use serde::{Deserialize, Serialize};

use crate::activities::wes::{self, StageInput};
use crate::config::WarehouseConfig;
use crate::constants::WALLING_COMPLETED_TIMEOUT;
use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::engine::select::{select2, Either};
use crate::types::ids::{OrderId, PathId, RouteId};
use crate::types::process_path::PathType;
use crate::workflows::leaf::{
    consolidation::{orchestrate_consolidation, ConsolidationInput},
    packing::{orchestrate_packing, PackingInput},
    picking::{orchestrate_picking, PickingInput},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WesExecutionInput {
    pub order_id: OrderId,
    pub path_id: PathId,
    pub tote_id: String,
    pub consolidation_required: bool,
    pub unit_ids: Vec<crate::types::ids::UnitId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WesExecutionOutput {
    pub success: bool,
    pub path_type: Option<PathType>,
    pub route_id: Option<RouteId>,
    pub stages_completed: u32,
    pub total_stages: u32,
    pub package_id: Option<crate::types::ids::PackageId>,
    pub tracking_number: Option<crate::types::ids::TrackingNumber>,
    pub error: Option<String>,
}

impl WesExecutionOutput {
    fn failure(stages_completed: u32, total_stages: u32, msg: impl Into<String>) -> Self {
        Self { success: false, stages_completed, total_stages, error: Some(msg.into()), ..Default::default() }
    }
}

/// Runs the per-stage AssignWorkerToStage/StartStage bracket around an
/// already-executed stage body, completing or failing the stage route
/// depending on the body's outcome.
async fn run_stage<C: WorkflowContext, T>(
    ctx: &C,
    route_id: &RouteId,
    stage: &str,
    options: &ActivityOptions,
    body: impl std::future::Future<Output = Result<T, String>>,
) -> Result<T, String> {
    let input = StageInput { route_id, stage };
    wes::assign_worker_to_stage(ctx, input.clone(), options).await.map_err(|e| e.to_string())?;
    wes::start_stage(ctx, input.clone(), options).await.map_err(|e| e.to_string())?;

    match body.await {
        Ok(value) => {
            if let Err(e) = wes::complete_stage(ctx, input, options).await {
                tracing::warn!(error = %e, stage, "CompleteStage failed, reconcilable");
            }
            Ok(value)
        }
        Err(reason) => {
            if let Err(e) = wes::fail_stage(ctx, input, &reason, options).await {
                tracing::warn!(error = %e, stage, "FailStage failed, reconcilable");
            }
            Err(reason)
        }
    }
}

#[tracing::instrument(skip_all, fields(%input.order_id))]
pub async fn orchestrate_wes_execution<C: WorkflowContext>(
    ctx: &C,
    input: WesExecutionInput,
    config: &WarehouseConfig,
) -> WesExecutionOutput {
    let options = ActivityOptions::from_config(config);

    let plan = match wes::resolve_execution_plan(ctx, input.path_id.clone(), &options).await {
        Ok(p) => p,
        Err(e) => return WesExecutionOutput::failure(0, 0, e.to_string()),
    };
    let total_stages = plan.stages.len() as u32;

    let route_id = match wes::create_task_route(ctx, input.order_id.clone(), input.path_id, &options).await {
        Ok(r) => r.route_id,
        Err(e) => return WesExecutionOutput::failure(0, total_stages, e.to_string()),
    };

    let mut stages_completed: u32 = 0;
    let mut expected_totes: u32 = 1;

    for stage in &plan.stages {
        let result: Result<(), String> = match stage.as_str() {
            "picking" => {
                // Picking runs on `orchestrator-queue` in the full deployment
                // (§4.3); composed inline here since there is no separate
                // workflow-registry dispatch in this core.
                let outcome = run_stage(ctx, &route_id, "picking", &options, async {
                    let output =
                        orchestrate_picking(ctx, PickingInput { order_id: input.order_id.clone(), tote_id: input.tote_id.clone() }, config)
                            .await;
                    if output.success {
                        Ok(output.tote_count)
                    } else {
                        Err(output.error.unwrap_or_else(|| "picking failed".to_string()))
                    }
                })
                .await;
                match outcome {
                    Ok(tote_count) => {
                        expected_totes = tote_count.max(1);
                        Ok(())
                    }
                    Err(reason) => Err(reason),
                }
            }
            "walling" => {
                run_stage(ctx, &route_id, "walling", &options, async {
                    if let Err(e) = wes::execute_walling_task(ctx, route_id.clone(), &options).await {
                        return Err(e.to_string());
                    }
                    match select2(ctx.wait_for_signal::<()>("wallingCompleted"), ctx.new_timer(WALLING_COMPLETED_TIMEOUT)).await {
                        Either::Left(()) => Ok(()),
                        Either::Right(()) => Err("wallingCompleted signal timed out".to_string()),
                    }
                })
                .await
            }
            "consolidation" if input.consolidation_required => {
                run_stage(ctx, &route_id, "consolidation", &options, async {
                    let output = orchestrate_consolidation(
                        ctx,
                        ConsolidationInput { order_id: input.order_id.clone(), route_id: route_id.clone(), expected_totes },
                        config,
                    )
                    .await;
                    if output.success {
                        Ok(())
                    } else {
                        Err(output.error.unwrap_or_else(|| "consolidation failed".to_string()))
                    }
                })
                .await
            }
            "consolidation" => Ok(()),
            "pack" | "packing" => {
                let outcome = run_stage(ctx, &route_id, "packing", &options, async {
                    let output = orchestrate_packing(
                        ctx,
                        PackingInput { order_id: input.order_id.clone(), unit_ids: input.unit_ids.clone() },
                        config,
                    )
                    .await;
                    if output.success {
                        Ok((output.package_id, output.tracking_number))
                    } else {
                        Err(output.error.unwrap_or_else(|| "packing failed".to_string()))
                    }
                })
                .await;
                match outcome {
                    Ok((package_id, tracking_number)) => {
                        stages_completed += 1;
                        return WesExecutionOutput {
                            success: true,
                            path_type: Some(plan.path_type),
                            route_id: Some(route_id),
                            stages_completed,
                            total_stages,
                            package_id,
                            tracking_number,
                            error: None,
                        };
                    }
                    Err(reason) => Err(reason),
                }
            }
            other => {
                tracing::warn!(stage = other, "unrecognized WES stage, skipping");
                Ok(())
            }
        };

        match result {
            Ok(()) => stages_completed += 1,
            Err(reason) => {
                return WesExecutionOutput::failure(stages_completed, total_stages, reason);
            }
        }
    }

    WesExecutionOutput {
        success: true,
        path_type: Some(plan.path_type),
        route_id: Some(route_id),
        stages_completed,
        total_stages,
        package_id: None,
        tracking_number: None,
        error: None,
    }
}
