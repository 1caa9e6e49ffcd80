//! StockShortage leaf workflow (§4.4.7): resolves a per-SKU shortage
//! once a pick comes back short.

use serde::{Deserialize, Serialize};

use crate::activities::shortage::{self, ShortageStrategy};
use crate::config::WarehouseConfig;
use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::types::ids::{OrderId, Sku};
use crate::types::tags::ShortageReason;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortedItem {
    pub sku: Sku,
    pub requested: u32,
    pub available: u32,
    pub reason: ShortageReason,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockShortageInput {
    pub order_id: OrderId,
    pub completed_count: usize,
    pub shorted_items: Vec<ShortedItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StockShortageOutput {
    pub success: bool,
    pub strategy: Option<String>,
    pub error: Option<String>,
}

#[tracing::instrument(skip_all, fields(%input.order_id))]
pub async fn orchestrate_stock_shortage<C: WorkflowContext>(
    ctx: &C,
    input: StockShortageInput,
    config: &WarehouseConfig,
) -> StockShortageOutput {
    let options = ActivityOptions::from_config(config);

    let requested: u32 = input.shorted_items.iter().map(|i| i.requested).sum();
    let available: u32 = input.shorted_items.iter().map(|i| i.available).sum();
    let ratio = if requested == 0 { 1.0 } else { available as f64 / requested as f64 };
    let strategy = shortage::select_shortage_strategy(input.completed_count, ratio);

    for item in &input.shorted_items {
        if let Err(e) = shortage::record_shortage(
            ctx,
            shortage::RecordShortageInput {
                order_id: input.order_id.clone(),
                sku: item.sku.clone(),
                requested: item.requested,
                available: item.available,
                reason: item.reason,
            },
            &options,
        )
        .await
        {
            return StockShortageOutput { success: false, error: Some(e.to_string()), ..Default::default() };
        }
    }

    let result = match strategy {
        ShortageStrategy::PartialShip => shortage::notify_customer_partial_ship(ctx, input.order_id, &options).await,
        ShortageStrategy::HoldForReview => shortage::notify_supervisor_shortage(ctx, input.order_id, &options).await,
        ShortageStrategy::FullBackorder => {
            let skus = input.shorted_items.iter().map(|i| i.sku.clone()).collect();
            if let Err(e) =
                shortage::create_backorder(ctx, shortage::CreateBackorderInput { order_id: input.order_id.clone(), skus }, &options).await
            {
                return StockShortageOutput { success: false, error: Some(e.to_string()), ..Default::default() };
            }
            shortage::notify_customer_full_backorder(ctx, input.order_id, &options).await
        }
    };

    if let Err(e) = result {
        tracing::warn!(error = %e, "shortage notification failed, reconcilable");
    }

    StockShortageOutput { success: true, strategy: Some(format!("{strategy:?}")), error: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_context::TestWorkflowContext;

    #[tokio::test]
    async fn majority_filled_partial_ships() {
        let ctx = TestWorkflowContext::new();
        ctx.stub_activity("RecordShortage", ());
        ctx.stub_activity("NotifyCustomerPartialShip", ());

        let output = orchestrate_stock_shortage(
            &ctx,
            StockShortageInput {
                order_id: OrderId::new("ORD-1"),
                completed_count: 7,
                shorted_items: vec![ShortedItem {
                    sku: Sku::new("SKU-A"),
                    requested: 10,
                    available: 7,
                    reason: ShortageReason::NotFound,
                }],
            },
            &WarehouseConfig::for_test(),
        )
        .await;

        assert!(output.success);
        assert_eq!(output.strategy, Some("PartialShip".to_string()));
    }

    #[tokio::test]
    async fn nothing_completed_backorders_fully() {
        let ctx = TestWorkflowContext::new();
        ctx.stub_activity("RecordShortage", ());
        ctx.stub_activity("CreateBackorder", ());
        ctx.stub_activity("NotifyCustomerFullBackorder", ());

        let output = orchestrate_stock_shortage(
            &ctx,
            StockShortageInput {
                order_id: OrderId::new("ORD-2"),
                completed_count: 0,
                shorted_items: vec![ShortedItem {
                    sku: Sku::new("SKU-B"),
                    requested: 5,
                    available: 0,
                    reason: ShortageReason::NotFound,
                }],
            },
            &WarehouseConfig::for_test(),
        )
        .await;

        assert!(output.success);
        assert_eq!(output.strategy, Some("FullBackorder".to_string()));
    }
}
