//! OrchestratedPicking leaf workflow (§4.4.1, §6 `pickCompleted`).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::activities::picking;
use crate::config::WarehouseConfig;
use crate::constants::PICK_COMPLETED_TIMEOUT;
use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::engine::select::{select2, Either};
use crate::types::allocation::PickResult;
use crate::types::ids::OrderId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickingInput {
    pub order_id: OrderId,
    pub tote_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PickingOutput {
    pub success: bool,
    pub allocation_ids: Vec<crate::types::ids::AllocationId>,
    pub tote_count: u32,
    pub error: Option<String>,
}

#[tracing::instrument(skip_all, fields(%input.order_id))]
pub async fn orchestrate_picking<C: WorkflowContext>(
    ctx: &C,
    input: PickingInput,
    config: &WarehouseConfig,
) -> PickingOutput {
    let options = ActivityOptions::from_config(config);

    let task = match picking::create_pick_task(ctx, input.order_id.clone(), &options).await {
        Ok(t) => t,
        Err(e) => return PickingOutput { success: false, error: Some(e.to_string()), ..Default::default() },
    };

    // worker assignment is a signal-wait in the full service flow; the
    // orchestrated variant only waits on pickCompleted (§4.4.1).
    let pick_result = match select2(
        ctx.wait_for_signal::<PickResult>("pickCompleted"),
        ctx.new_timer(PICK_COMPLETED_TIMEOUT),
    )
    .await
    {
        Either::Left(result) => result,
        Either::Right(()) => {
            return PickingOutput { success: false, error: Some("pickCompleted signal timed out".to_string()), ..Default::default() };
        }
    };

    if !pick_result.success {
        return PickingOutput { success: false, error: Some("pick reported failure".to_string()), ..Default::default() };
    }

    let tote_count =
        pick_result.picked_items.iter().map(|item| item.tote_id.clone()).collect::<HashSet<_>>().len() as u32;

    let reservations = match picking::fetch_reservation_ids(ctx, task.task_id, &options).await {
        Ok(r) => r.reservation_ids,
        Err(e) => {
            tracing::warn!(error = %e, "FetchReservationIds failed");
            vec![]
        }
    };

    let allocation_ids = match picking::stage_inventory(
        ctx,
        crate::activities::picking::StageInventoryInput { reservation_ids: reservations, tote_id: input.tote_id },
        &options,
    )
    .await
    {
        Ok(out) => out.allocation_ids,
        Err(e) => {
            tracing::warn!(error = %e, "StageInventory failed, reconcilable");
            vec![]
        }
    };

    PickingOutput { success: true, allocation_ids, tote_count, error: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_context::TestWorkflowContext;
    use crate::types::allocation::PickedItem;
    use crate::types::ids::{AllocationId, ReservationId, TaskId, ToteId};

    #[tokio::test]
    async fn pick_completed_before_timeout_stages_inventory() {
        let ctx = TestWorkflowContext::new();
        ctx.stub_activity("CreatePickTask", picking::CreatePickTaskOutput { task_id: TaskId::new("TASK-1") });
        ctx.enqueue_signal(
            "pickCompleted",
            PickResult {
                task_id: TaskId::new("TASK-1"),
                picked_items: vec![PickedItem {
                    sku: crate::types::ids::Sku::new("SKU-A"),
                    qty: 1,
                    location_id: "A1".to_string(),
                    tote_id: ToteId::new("TOTE-1"),
                }],
                allocation_ids: vec![],
                success: true,
                unit_ids: None,
            },
        );
        ctx.stub_activity(
            "FetchReservationIds",
            picking::FetchReservationIdsOutput { reservation_ids: vec![ReservationId::new("R-1")] },
        );
        ctx.stub_activity(
            "StageInventory",
            picking::StageInventoryOutput { allocation_ids: vec![AllocationId::new("ALLOC-1")] },
        );

        let output = orchestrate_picking(
            &ctx,
            PickingInput { order_id: OrderId::new("ORD-1"), tote_id: "TOTE-1".to_string() },
            &WarehouseConfig::for_test(),
        )
        .await;

        assert!(output.success);
        assert_eq!(output.allocation_ids, vec![AllocationId::new("ALLOC-1")]);
        assert_eq!(output.tote_count, 1);
    }

    #[tokio::test]
    async fn distinct_totes_are_counted_once_each() {
        let ctx = TestWorkflowContext::new();
        ctx.stub_activity("CreatePickTask", picking::CreatePickTaskOutput { task_id: TaskId::new("TASK-1") });
        ctx.enqueue_signal(
            "pickCompleted",
            PickResult {
                task_id: TaskId::new("TASK-1"),
                picked_items: vec![
                    PickedItem {
                        sku: crate::types::ids::Sku::new("SKU-A"),
                        qty: 1,
                        location_id: "A1".to_string(),
                        tote_id: ToteId::new("TOTE-1"),
                    },
                    PickedItem {
                        sku: crate::types::ids::Sku::new("SKU-B"),
                        qty: 1,
                        location_id: "A2".to_string(),
                        tote_id: ToteId::new("TOTE-2"),
                    },
                    PickedItem {
                        sku: crate::types::ids::Sku::new("SKU-A"),
                        qty: 1,
                        location_id: "A1".to_string(),
                        tote_id: ToteId::new("TOTE-1"),
                    },
                ],
                allocation_ids: vec![],
                success: true,
                unit_ids: None,
            },
        );
        ctx.stub_activity(
            "FetchReservationIds",
            picking::FetchReservationIdsOutput { reservation_ids: vec![ReservationId::new("R-1")] },
        );
        ctx.stub_activity(
            "StageInventory",
            picking::StageInventoryOutput { allocation_ids: vec![AllocationId::new("ALLOC-1")] },
        );

        let output = orchestrate_picking(
            &ctx,
            PickingInput { order_id: OrderId::new("ORD-1"), tote_id: "TOTE-1".to_string() },
            &WarehouseConfig::for_test(),
        )
        .await;

        assert_eq!(output.tote_count, 2);
    }

    #[tokio::test]
    async fn timeout_without_signal_is_terminal() {
        let ctx = TestWorkflowContext::new();
        ctx.stub_activity("CreatePickTask", picking::CreatePickTaskOutput { task_id: TaskId::new("TASK-1") });

        let output = orchestrate_picking(
            &ctx,
            PickingInput { order_id: OrderId::new("ORD-2"), tote_id: "TOTE-2".to_string() },
            &WarehouseConfig::for_test(),
        )
        .await;

        assert!(!output.success);
        assert!(output.error.unwrap().contains("timed out"));
    }
}
