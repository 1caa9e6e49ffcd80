//! GiftWrap leaf workflow (§4.4.5, `gift-wrap-completed` signal).

use serde::{Deserialize, Serialize};

use crate::activities::giftwrap;
use crate::config::WarehouseConfig;
use crate::constants::GIFT_WRAP_COMPLETED_TIMEOUT;
use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::engine::select::{select2, Either};
use crate::types::ids::{OrderId, StationId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiftWrapInput {
    pub order_id: OrderId,
    pub station_id: Option<StationId>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GiftWrapOutput {
    pub success: bool,
    pub error: Option<String>,
}

#[tracing::instrument(skip_all, fields(%input.order_id))]
pub async fn orchestrate_gift_wrap<C: WorkflowContext>(
    ctx: &C,
    input: GiftWrapInput,
    config: &WarehouseConfig,
) -> GiftWrapOutput {
    let options = ActivityOptions::from_config(config);

    let station_id = if let Some(station_id) = input.station_id {
        Some(station_id)
    } else {
        match giftwrap::find_capable_station(ctx, "gift_wrap", &options).await {
            Ok(out) => Some(out.station_id),
            Err(e) => {
                tracing::warn!(error = %e, "FindCapableStation failed, proceeding without a station");
                None
            }
        }
    };

    let task_id = match giftwrap::create_gift_wrap_task(ctx, input.order_id, station_id, &options).await {
        Ok(t) => t,
        Err(e) => return GiftWrapOutput { success: false, error: Some(e.to_string()) },
    };

    if let Err(e) = giftwrap::assign_gift_wrap_worker(ctx, task_id.clone(), &options).await {
        return GiftWrapOutput { success: false, error: Some(e.to_string()) };
    }

    match select2(ctx.wait_for_signal::<()>("gift-wrap-completed"), ctx.new_timer(GIFT_WRAP_COMPLETED_TIMEOUT)).await {
        Either::Left(()) => {}
        Either::Right(()) => {
            // No signal arrived; poll the status activity once as a fallback
            // before giving up, in case the signal was simply dropped.
            match giftwrap::check_gift_wrap_status(ctx, task_id.clone(), &options).await {
                Ok(status) if status.completed => {}
                _ => return GiftWrapOutput { success: false, error: Some("gift wrap did not complete in time".to_string()) },
            }
        }
    }

    if let Err(e) = giftwrap::apply_gift_message(
        ctx,
        giftwrap::ApplyGiftMessageInput { task_id: task_id.clone(), message: input.message },
        &options,
    )
    .await
    {
        tracing::warn!(error = %e, "ApplyGiftMessage failed, reconcilable");
    }

    if let Err(e) = giftwrap::complete_gift_wrap_task(ctx, task_id, &options).await {
        return GiftWrapOutput { success: false, error: Some(e.to_string()) };
    }

    GiftWrapOutput { success: true, error: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_context::TestWorkflowContext;
    use crate::types::ids::TaskId;

    #[tokio::test]
    async fn completed_signal_finishes_task() {
        let ctx = TestWorkflowContext::new();
        ctx.stub_activity(
            "FindCapableStation",
            giftwrap::FindCapableStationOutput { station_id: StationId::new("ST-GW-1") },
        );
        ctx.stub_activity("CreateGiftWrapTask", TaskId::new("TASK-1"));
        ctx.stub_activity("AssignGiftWrapWorker", ());
        ctx.enqueue_signal("gift-wrap-completed", ());
        ctx.stub_activity("ApplyGiftMessage", ());
        ctx.stub_activity("CompleteGiftWrapTask", ());

        let output = orchestrate_gift_wrap(
            &ctx,
            GiftWrapInput { order_id: OrderId::new("ORD-1"), station_id: None, message: Some("Happy birthday".to_string()) },
            &WarehouseConfig::for_test(),
        )
        .await;

        assert!(output.success);
        assert_eq!(ctx.call_count("FindCapableStation"), 1);
    }

    #[tokio::test]
    async fn given_station_skips_the_lookup() {
        let ctx = TestWorkflowContext::new();
        ctx.stub_activity("CreateGiftWrapTask", TaskId::new("TASK-1"));
        ctx.stub_activity("AssignGiftWrapWorker", ());
        ctx.enqueue_signal("gift-wrap-completed", ());
        ctx.stub_activity("ApplyGiftMessage", ());
        ctx.stub_activity("CompleteGiftWrapTask", ());

        let output = orchestrate_gift_wrap(
            &ctx,
            GiftWrapInput { order_id: OrderId::new("ORD-1"), station_id: Some(StationId::new("ST-1")), message: None },
            &WarehouseConfig::for_test(),
        )
        .await;

        assert!(output.success);
        assert_eq!(ctx.call_count("FindCapableStation"), 0);
    }
}
