//! Disconnected compensation scope (§4.2, §4.7, §5 "Cancellation
//! semantics"), grounded on the reference framework's
//! `saga_compensation` module: a handle threaded through Planning and
//! OrderFulfillment so release activities still dispatch after the
//! parent scope has been cancelled.

use async_trait::async_trait;

use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::error::CompensationError;
use crate::types::allocation::ReturnItem;
use crate::types::ids::{OrderId, ReservationId};

/// A single held resource awaiting release, recorded the moment its
/// reservation activity succeeds so compensation never has to guess
/// what was actually acquired.
#[derive(Debug, Clone)]
pub enum ReleaseAction {
    ReleaseUnits { reservation_id: ReservationId },
    ReleaseStationCapacity { reservation_id: ReservationId },
    ReleaseEquipment { reservation_id: ReservationId },
    ReleaseInventoryReservation { order_id: OrderId },
    ReturnInventoryToShelf { order_id: OrderId, returned_by: String, reason: String, items: Vec<ReturnItem> },
}

impl ReleaseAction {
    fn activity_name(&self) -> &'static str {
        match self {
            ReleaseAction::ReleaseUnits { .. } => "ReleaseUnits",
            ReleaseAction::ReleaseStationCapacity { .. } => "ReleaseStationCapacity",
            ReleaseAction::ReleaseEquipment { .. } => "ReleaseEquipment",
            ReleaseAction::ReleaseInventoryReservation { .. } => "ReleaseInventoryReservation",
            ReleaseAction::ReturnInventoryToShelf { .. } => "ReturnInventoryToShelf",
        }
    }
}

/// Disconnected release client: workflows implement this against their
/// live `WorkflowContext`, but it is a separate, narrower trait so a
/// cancelled parent scope can't prevent dispatch (§5).
#[async_trait]
pub trait CompensationDispatcher: Send + Sync {
    async fn dispatch(&self, action: &ReleaseAction, options: &ActivityOptions) -> Result<(), CompensationError>;
}

/// Blanket dispatcher backed directly by a `WorkflowContext`. Every
/// release call is idempotent server-side (§8 "Idempotent
/// compensation"); a second call after success is a no-op.
pub struct ContextCompensationDispatcher<'a, C: WorkflowContext> {
    pub ctx: &'a C,
}

#[async_trait]
impl<'a, C: WorkflowContext> CompensationDispatcher for ContextCompensationDispatcher<'a, C> {
    async fn dispatch(&self, action: &ReleaseAction, options: &ActivityOptions) -> Result<(), CompensationError> {
        let name = action.activity_name();
        let result: Result<(), _> = match action {
            ReleaseAction::ReleaseUnits { reservation_id } => {
                self.ctx.execute_activity(name, reservation_id.clone(), options).await
            }
            ReleaseAction::ReleaseStationCapacity { reservation_id } => {
                self.ctx.execute_activity(name, reservation_id.clone(), options).await
            }
            ReleaseAction::ReleaseEquipment { reservation_id } => {
                self.ctx.execute_activity(name, reservation_id.clone(), options).await
            }
            ReleaseAction::ReleaseInventoryReservation { order_id } => {
                self.ctx.execute_activity(name, order_id.clone(), options).await
            }
            ReleaseAction::ReturnInventoryToShelf { order_id, returned_by, reason, items } => {
                #[derive(serde::Serialize)]
                struct Input<'b> {
                    order_id: &'b OrderId,
                    returned_by: &'b str,
                    reason: &'b str,
                    items: &'b [ReturnItem],
                }
                self.ctx
                    .execute_activity(name, Input { order_id, returned_by, reason, items }, options)
                    .await
            }
        };
        result.map_err(|e| CompensationError::ReleaseFailed(e.to_string()))
    }
}

/// Accumulates resource releases as Planning/OrderFulfillment acquire
/// them, then fires every held release best-effort on the failure
/// path. Never blocks terminal status propagation (§4.2).
#[derive(Debug, Clone, Default)]
pub struct CompensationContext {
    pending: Vec<ReleaseAction>,
}

impl CompensationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hold(&mut self, action: ReleaseAction) {
        self.pending.push(action);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Runs every held release, logging failures rather than
    /// propagating them — compensation is best-effort by contract.
    pub async fn run<D: CompensationDispatcher>(&self, dispatcher: &D, options: &ActivityOptions) {
        for action in &self.pending {
            if let Err(err) = dispatcher.dispatch(action, options).await {
                tracing::warn!(activity = action.activity_name(), error = %err, "compensation release failed, left for manual reconciliation");
            } else {
                tracing::debug!(activity = action.activity_name(), "compensation release succeeded");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingDispatcher {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CompensationDispatcher for CountingDispatcher {
        async fn dispatch(&self, _action: &ReleaseAction, _options: &ActivityOptions) -> Result<(), CompensationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn run_dispatches_every_held_release() {
        let mut ctx = CompensationContext::new();
        ctx.hold(ReleaseAction::ReleaseUnits { reservation_id: ReservationId::new("R-1") });
        ctx.hold(ReleaseAction::ReleaseStationCapacity { reservation_id: ReservationId::new("R-2") });
        ctx.hold(ReleaseAction::ReleaseInventoryReservation { order_id: OrderId::new("ORD-1") });

        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = CountingDispatcher { calls: calls.clone() };
        ctx.run(&dispatcher, &ActivityOptions::default()).await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn new_context_is_empty() {
        assert!(CompensationContext::new().is_empty());
    }
}
