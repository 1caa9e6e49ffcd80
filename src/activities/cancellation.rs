//! Cancellation activities (§4.4.9). `ReleaseInventoryReservation` and
//! `ReturnInventoryToShelf` are dispatched through
//! [`crate::compensation`] rather than duplicated here.

use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::error::ActivityError;
use crate::types::ids::OrderId;

pub async fn cancel_order<C: WorkflowContext>(
    ctx: &C,
    order_id: OrderId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("CancelOrder", order_id, options).await
}

pub async fn notify_customer_cancellation<C: WorkflowContext>(
    ctx: &C,
    order_id: OrderId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("NotifyCustomerCancellation", order_id, &options.clone().best_effort()).await
}
