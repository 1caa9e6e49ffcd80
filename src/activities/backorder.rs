//! BackorderFulfillment activities (§4.4.8).

use serde::Serialize;

use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::error::ActivityError;
use crate::types::ids::{OrderId, Sku, TaskId};

#[derive(Debug, Clone, Serialize)]
pub struct ReserveStockForBackorderInput {
    pub order_id: OrderId,
    pub skus: Vec<Sku>,
}

pub async fn reserve_stock_for_backorder<C: WorkflowContext>(
    ctx: &C,
    input: ReserveStockForBackorderInput,
    options: &ActivityOptions,
) -> Result<bool, ActivityError> {
    ctx.execute_activity("ReserveStockForBackorder", input, options).await
}

pub async fn create_backorder_pick_task<C: WorkflowContext>(
    ctx: &C,
    order_id: OrderId,
    options: &ActivityOptions,
) -> Result<TaskId, ActivityError> {
    ctx.execute_activity("CreateBackorderPickTask", order_id, options).await
}

pub async fn mark_backorder_in_progress<C: WorkflowContext>(
    ctx: &C,
    order_id: OrderId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("MarkBackorderInProgress", order_id, &options.clone().best_effort()).await
}

pub async fn notify_customer_backorder_shipping<C: WorkflowContext>(
    ctx: &C,
    order_id: OrderId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("NotifyCustomerBackorderShipping", order_id, &options.clone().best_effort()).await
}
