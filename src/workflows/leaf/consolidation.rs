//! Consolidation leaf workflow (§4.4.3, `toteArrived` signal).

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activities::consolidation;
use crate::config::WarehouseConfig;
use crate::constants::TOTE_ARRIVED_TIMEOUT;
use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::engine::select::{select2, Either};
use crate::types::ids::{OrderId, RouteId, ToteId, UnitId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationInput {
    pub order_id: OrderId,
    pub route_id: RouteId,
    pub expected_totes: u32,
}

/// `toteArrived` signal payload (§4.4.3, spec signal table): totes may
/// arrive in any order, so the workflow tracks arrivals by `toteId`
/// rather than counting signal deliveries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToteArrivedEvent {
    pub tote_id: ToteId,
    pub route_id: RouteId,
    pub route_index: u32,
    pub arrived_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConsolidationOutput {
    pub success: bool,
    pub unit_id: Option<UnitId>,
    pub error: Option<String>,
}

impl ConsolidationOutput {
    fn failure(msg: impl Into<String>) -> Self {
        Self { success: false, error: Some(msg.into()), ..Default::default() }
    }
}

#[tracing::instrument(skip_all, fields(%input.order_id))]
pub async fn orchestrate_consolidation<C: WorkflowContext>(
    ctx: &C,
    input: ConsolidationInput,
    config: &WarehouseConfig,
) -> ConsolidationOutput {
    let options = ActivityOptions::from_config(config);

    let unit_id = match consolidation::create_consolidation_unit(ctx, input.order_id.clone(), &options).await {
        Ok(out) => out.unit_id,
        Err(e) => return ConsolidationOutput::failure(e.to_string()),
    };

    let mut arrived: HashSet<ToteId> = HashSet::new();
    while (arrived.len() as u32) < input.expected_totes {
        match select2(ctx.wait_for_signal::<ToteArrivedEvent>("toteArrived"), ctx.new_timer(TOTE_ARRIVED_TIMEOUT)).await
        {
            Either::Left(event) => {
                arrived.insert(event.tote_id);
            }
            Either::Right(()) => {
                tracing::warn!(
                    arrived = arrived.len(),
                    expected = input.expected_totes,
                    "toteArrived timed out, proceeding with partial totes"
                );
                break;
            }
        }
    }

    if let Err(e) = consolidation::consolidate_items(ctx, unit_id.clone(), &options).await {
        return ConsolidationOutput::failure(e.to_string());
    }

    let verified = match consolidation::verify_consolidation(ctx, unit_id.clone(), &options).await {
        Ok(v) => v,
        Err(e) => return ConsolidationOutput::failure(e.to_string()),
    };
    if !verified {
        return ConsolidationOutput::failure("consolidation verification failed");
    }

    if let Err(e) = consolidation::complete_consolidation(ctx, unit_id.clone(), &options).await {
        return ConsolidationOutput::failure(e.to_string());
    }

    if let Err(e) = consolidation::confirm_unit_consolidation(
        ctx,
        consolidation::ConfirmUnitConsolidationInput { unit_id: unit_id.clone(), route_id: input.route_id },
        &options,
    )
    .await
    {
        tracing::warn!(error = %e, "ConfirmUnitConsolidation failed, reconcilable");
    }

    ConsolidationOutput { success: true, unit_id: Some(unit_id), error: None }
}
