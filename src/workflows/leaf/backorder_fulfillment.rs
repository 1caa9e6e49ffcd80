//! BackorderFulfillment leaf workflow (§4.4.8).

use serde::{Deserialize, Serialize};

use crate::activities::backorder;
use crate::config::WarehouseConfig;
use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::types::ids::{OrderId, Sku, TaskId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackorderFulfillmentInput {
    pub order_id: OrderId,
    pub skus: Vec<Sku>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BackorderFulfillmentOutput {
    pub success: bool,
    pub task_id: Option<TaskId>,
    pub error: Option<String>,
}

#[tracing::instrument(skip_all, fields(%input.order_id))]
pub async fn orchestrate_backorder_fulfillment<C: WorkflowContext>(
    ctx: &C,
    input: BackorderFulfillmentInput,
    config: &WarehouseConfig,
) -> BackorderFulfillmentOutput {
    let options = ActivityOptions::from_config(config);

    let reserved = match backorder::reserve_stock_for_backorder(
        ctx,
        backorder::ReserveStockForBackorderInput { order_id: input.order_id.clone(), skus: input.skus },
        &options,
    )
    .await
    {
        Ok(r) => r,
        Err(e) => return BackorderFulfillmentOutput { success: false, error: Some(e.to_string()), ..Default::default() },
    };
    if !reserved {
        return BackorderFulfillmentOutput { success: false, error: Some("stock still unavailable".to_string()), ..Default::default() };
    }

    let task_id = match backorder::create_backorder_pick_task(ctx, input.order_id.clone(), &options).await {
        Ok(t) => t,
        Err(e) => return BackorderFulfillmentOutput { success: false, error: Some(e.to_string()), ..Default::default() },
    };

    if let Err(e) = backorder::mark_backorder_in_progress(ctx, input.order_id.clone(), &options).await {
        tracing::warn!(error = %e, "MarkBackorderInProgress failed, reconcilable");
    }
    if let Err(e) = backorder::notify_customer_backorder_shipping(ctx, input.order_id, &options).await {
        tracing::warn!(error = %e, "NotifyCustomerBackorderShipping failed, reconcilable");
    }

    BackorderFulfillmentOutput { success: true, task_id: Some(task_id), error: None }
}
