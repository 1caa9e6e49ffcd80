//! Cancellation leaf workflow (§4.4.9): unwinds whatever the parent
//! saga had already reserved, via [`crate::compensation`], then marks
//! the order cancelled.
//!
//! Two flavours, branched per allocation (§4.4.9): a plain soft
//! reservation releases through the ordinary compensation scope; a
//! hard-allocated or already-packed unit instead becomes a
//! `ReturnInventoryToShelf` item, since it was physically pulled and a
//! logical release alone wouldn't put it back on the shelf.

use serde::{Deserialize, Serialize};

use crate::activities::cancellation;
use crate::compensation::{CompensationContext, CompensationDispatcher, ContextCompensationDispatcher, ReleaseAction};
use crate::config::WarehouseConfig;
use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::types::allocation::{AllocationState, ReturnItem};
use crate::types::ids::{AllocationId, OrderId, Sku};

/// One unit's allocation state at the moment cancellation runs, used to
/// pick the release flavour per unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocatedUnit {
    pub allocation_id: AllocationId,
    pub sku: Sku,
    pub state: AllocationState,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CancellationOutput {
    pub success: bool,
    pub error: Option<String>,
}

#[tracing::instrument(skip_all, fields(%order_id))]
pub async fn orchestrate_cancellation<C: WorkflowContext>(
    ctx: &C,
    order_id: OrderId,
    allocations: &[AllocatedUnit],
    compensation: &CompensationContext,
    reason: impl Into<String>,
    config: &WarehouseConfig,
) -> CancellationOutput {
    let options = ActivityOptions::from_config(config).best_effort();
    let dispatcher = ContextCompensationDispatcher { ctx };

    compensation.run(&dispatcher, &options).await;

    let return_items: Vec<ReturnItem> = allocations
        .iter()
        .filter(|unit| unit.state.is_hard())
        .map(|unit| ReturnItem { allocation_id: unit.allocation_id.clone(), sku: unit.sku.clone() })
        .collect();

    if !return_items.is_empty() {
        let action = ReleaseAction::ReturnInventoryToShelf {
            order_id: order_id.clone(),
            returned_by: "cancellation-workflow".to_string(),
            reason: reason.into(),
            items: return_items,
        };
        if let Err(e) = dispatcher.dispatch(&action, &options).await {
            tracing::warn!(error = %e, "ReturnInventoryToShelf failed, left for manual reconciliation");
        }
    }

    if let Err(e) = cancellation::cancel_order(ctx, order_id.clone(), &options).await {
        return CancellationOutput { success: false, error: Some(e.to_string()) };
    }

    if let Err(e) = cancellation::notify_customer_cancellation(ctx, order_id, &options).await {
        tracing::warn!(error = %e, "NotifyCustomerCancellation failed, reconcilable");
    }

    CancellationOutput { success: true, error: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_context::TestWorkflowContext;
    use crate::types::ids::ReservationId;

    #[tokio::test]
    async fn cancellation_releases_held_resources_first() {
        let ctx = TestWorkflowContext::new();
        ctx.stub_activity("ReleaseStationCapacity", ());
        ctx.stub_activity("CancelOrder", ());
        ctx.stub_activity("NotifyCustomerCancellation", ());

        let mut compensation = CompensationContext::new();
        compensation.hold(ReleaseAction::ReleaseStationCapacity { reservation_id: ReservationId::new("R-1") });

        let output = orchestrate_cancellation(
            &ctx,
            OrderId::new("ORD-1"),
            &[],
            &compensation,
            "customer requested cancel",
            &WarehouseConfig::for_test(),
        )
        .await;

        assert!(output.success);
        assert_eq!(ctx.call_count("ReleaseStationCapacity"), 1);
        assert_eq!(ctx.call_count("CancelOrder"), 1);
        assert_eq!(ctx.call_count("ReturnInventoryToShelf"), 0);
    }

    #[tokio::test]
    async fn hard_allocated_units_are_returned_to_shelf_instead_of_released() {
        let ctx = TestWorkflowContext::new();
        ctx.stub_activity("ReturnInventoryToShelf", ());
        ctx.stub_activity("CancelOrder", ());
        ctx.stub_activity("NotifyCustomerCancellation", ());

        let allocations = vec![
            AllocatedUnit {
                allocation_id: AllocationId::new("ALLOC-1"),
                sku: Sku::new("SKU-A"),
                state: AllocationState::Packed,
            },
            AllocatedUnit {
                allocation_id: AllocationId::new("ALLOC-2"),
                sku: Sku::new("SKU-B"),
                state: AllocationState::SoftReserved,
            },
        ];

        let output = orchestrate_cancellation(
            &ctx,
            OrderId::new("ORD-2"),
            &allocations,
            &CompensationContext::new(),
            "pick already completed",
            &WarehouseConfig::for_test(),
        )
        .await;

        assert!(output.success);
        assert_eq!(ctx.call_count("ReturnInventoryToShelf"), 1);
        let call = ctx.recorded_calls().into_iter().find(|c| c.name == "ReturnInventoryToShelf").unwrap();
        let items = call.input.get("items").unwrap().as_array().unwrap();
        assert_eq!(items.len(), 1);
    }
}
