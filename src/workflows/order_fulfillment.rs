//! OrderFulfillment saga (§4.1): the top-level workflow that owns one
//! order's state machine end to end. Drives validation, Planning,
//! WESExecution, SLAM, Sortation, and Shipping as a single saga,
//! compensating inventory reservations if WESExecution fails.

use serde::{Deserialize, Serialize};

use crate::activities::order;
use crate::compensation::{CompensationContext, ReleaseAction};
use crate::config::WarehouseConfig;
use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::types::allocation::AllocationState;
use crate::types::ids::{OrderId, PathId, TrackingNumber, WaveId};
use crate::types::order::OrderRequest;
use crate::types::process_path::{PathType, ProcessPath, ZoneLayout};
use crate::workflows::leaf::cancellation::{orchestrate_cancellation, AllocatedUnit};
use crate::workflows::leaf::shipping::{orchestrate_shipping, ShippingInput};
use crate::workflows::leaf::sortation::{orchestrate_sortation, SortationInput};
use crate::workflows::planning::{orchestrate_planning, PlanningInput};
use crate::workflows::wes_execution::{orchestrate_wes_execution, WesExecutionInput};

/// Zips planning's reserved allocation ids with the skus they cover,
/// tagged with a single allocation state, for a cancellation flavour
/// decision (§4.4.9).
fn allocated_units(
    allocation_ids: &[crate::types::ids::AllocationId],
    items: &[crate::types::order::OrderItem],
    state: AllocationState,
) -> Vec<AllocatedUnit> {
    let skus = items.iter().flat_map(|item| std::iter::repeat(item.sku.clone()).take(item.quantity as usize));
    allocation_ids.iter().cloned().zip(skus).map(|(allocation_id, sku)| AllocatedUnit { allocation_id, sku, state }).collect()
}

/// Observable stages of the saga, in order (§4.1, §6 `getStatus`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentStage {
    Validation,
    Planning,
    WesExecution,
    Slam,
    Sortation,
    Shipping,
    Completed,
}

impl FulfillmentStage {
    fn index(&self) -> u32 {
        match self {
            FulfillmentStage::Validation => 0,
            FulfillmentStage::Planning => 1,
            FulfillmentStage::WesExecution => 2,
            FulfillmentStage::Slam => 3,
            FulfillmentStage::Sortation => 4,
            FulfillmentStage::Shipping => 4,
            FulfillmentStage::Completed => 5,
        }
    }
}

pub const TOTAL_STAGES: u32 = 5;

/// `getStatus` query response shape (§4.1, §6). The live synchronous
/// query dispatch itself is engine machinery (out of scope); this is
/// the pure snapshot a query handler would serve from workflow state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub order_id: OrderId,
    pub current_stage: FulfillmentStage,
    pub status: &'static str,
    pub completion_percent: u32,
    pub total_stages: u32,
    pub completed_stages: u32,
    pub error: Option<String>,
}

pub fn snapshot_for(order_id: OrderId, stage: FulfillmentStage, failed_status: Option<&str>) -> StatusSnapshot {
    let completed_stages = stage.index();
    let status = failed_status.unwrap_or(if stage == FulfillmentStage::Completed { "completed" } else { "in_progress" });
    StatusSnapshot {
        order_id,
        current_stage: stage,
        status,
        completion_percent: (completed_stages * 100) / TOTAL_STAGES,
        total_stages: TOTAL_STAGES,
        completed_stages,
        error: failed_status.map(|_| status.to_string()),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OrderFulfillmentOutput {
    pub order_id: Option<OrderId>,
    pub status: String,
    pub tracking_number: Option<TrackingNumber>,
    pub wave_id: Option<WaveId>,
    pub path_id: Option<PathId>,
    pub completed_units: Option<u32>,
    pub failed_units: Option<u32>,
    pub exception_ids: Vec<String>,
    pub partial_success: bool,
    pub error: Option<String>,
}

impl OrderFulfillmentOutput {
    fn terminal(order_id: &OrderId, status: &str, error: impl Into<String>) -> Self {
        Self {
            order_id: Some(order_id.clone()),
            status: status.to_string(),
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

#[tracing::instrument(skip_all, fields(%order.order_id))]
pub async fn orchestrate_order_fulfillment<C: WorkflowContext>(
    ctx: &C,
    order: OrderRequest,
    config: &WarehouseConfig,
) -> OrderFulfillmentOutput {
    let options = ActivityOptions::from_config(config);

    let valid = match order::validate_order(ctx, &order, &options).await {
        Ok(v) => v,
        Err(e) => return OrderFulfillmentOutput::terminal(&order.order_id, "validation_failed", e.to_string()),
    };
    if !valid {
        return OrderFulfillmentOutput::terminal(&order.order_id, "validation_failed", "order failed validation");
    }

    let zones = if order.items.len() > 1 { ZoneLayout::Multi } else { ZoneLayout::Single };

    let planning = orchestrate_planning(
        ctx,
        PlanningInput {
            order_id: order.order_id.clone(),
            priority: order.priority,
            items: order.items.clone(),
            zones,
            gift_wrap: order.gift_wrap.clone(),
            hazmat: order.hazmat.clone(),
            cold_chain: order.cold_chain.clone(),
            total_value: order.total_value,
            unit_ids: order.unit_ids.clone(),
            handler_id: "order-fulfillment".to_string(),
        },
        config,
    )
    .await;
    if !planning.success {
        return OrderFulfillmentOutput::terminal(&order.order_id, "planning_failed", planning.error.unwrap_or_default());
    }
    let path_id = planning.path_id.clone();
    let wave_id = planning.wave_id.clone();
    let consolidation_required = ProcessPath::consolidation_required_for(
        order.item_count(),
        zones,
        planning.path_type.unwrap_or(PathType::PickPack),
    );

    let wes = orchestrate_wes_execution(
        ctx,
        WesExecutionInput {
            order_id: order.order_id.clone(),
            path_id: path_id.clone().unwrap_or_else(|| PathId::new(format!("path-{}", order.order_id))),
            tote_id: format!("tote-{}", order.order_id),
            consolidation_required,
            unit_ids: planning.reserved_unit_ids.clone(),
        },
        config,
    )
    .await;
    if !wes.success {
        let mut comp = CompensationContext::new();
        comp.hold(ReleaseAction::ReleaseInventoryReservation { order_id: order.order_id.clone() });
        // Picking hasn't run to completion yet, so every reserved unit is
        // still a soft reservation (simple cancellation flavour).
        let allocations = allocated_units(&planning.allocation_ids, &order.items, AllocationState::SoftReserved);
        orchestrate_cancellation(ctx, order.order_id.clone(), &allocations, &comp, "wes_execution_failed", config).await;
        return OrderFulfillmentOutput {
            order_id: Some(order.order_id.clone()),
            status: "wes_execution_failed".to_string(),
            wave_id,
            path_id,
            error: wes.error,
            ..Default::default()
        };
    }

    let package_id = match wes.package_id.clone() {
        Some(id) => id,
        None => return OrderFulfillmentOutput::terminal(&order.order_id, "slam_failed", "WESExecution produced no package"),
    };

    let slam = match order::execute_slam(
        ctx,
        order::ExecuteSlamInput {
            order_id: order.order_id.clone(),
            package_id: package_id.clone(),
            expected_weight: order.items.iter().map(|i| i.weight).sum(),
            carrier: "default".to_string(),
        },
        &options,
    )
    .await
    {
        Ok(out) => out,
        Err(e) => return OrderFulfillmentOutput::terminal(&order.order_id, "slam_failed", e.to_string()),
    };

    if let Err(e) = order::mark_packed(ctx, order.order_id.clone(), &options).await {
        tracing::warn!(error = %e, "MarkPacked failed, reconcilable");
    }

    let sortation = orchestrate_sortation(
        ctx,
        SortationInput {
            sortation_center: "SC1".to_string(),
            destination_zip: slam.destination.clone(),
            carrier_id: slam.carrier_id.clone(),
            package_id: package_id.clone(),
        },
        config,
    )
    .await;
    if !sortation.success {
        // The package has already been packed by this point, so its units
        // are hard-allocated and must go back to the shelf rather than
        // just be released (§4.4.9 with-allocations flavour).
        let allocations = allocated_units(&planning.allocation_ids, &order.items, AllocationState::Packed);
        orchestrate_cancellation(
            ctx,
            order.order_id.clone(),
            &allocations,
            &CompensationContext::new(),
            "sortation_failed",
            config,
        )
        .await;
        return OrderFulfillmentOutput {
            order_id: Some(order.order_id.clone()),
            status: "sortation_failed".to_string(),
            wave_id,
            path_id,
            tracking_number: Some(slam.tracking_number),
            error: sortation.error,
            ..Default::default()
        };
    }

    let shipping = orchestrate_shipping(
        ctx,
        ShippingInput {
            order_id: order.order_id.clone(),
            package_id,
            tracking_number: slam.tracking_number.clone(),
            carrier_id: slam.carrier_id.clone(),
            unit_ids: planning.reserved_unit_ids.clone(),
        },
        config,
    )
    .await;
    if !shipping.success {
        let allocations = allocated_units(&planning.allocation_ids, &order.items, AllocationState::Packed);
        orchestrate_cancellation(
            ctx,
            order.order_id.clone(),
            &allocations,
            &CompensationContext::new(),
            "shipping_failed",
            config,
        )
        .await;
        return OrderFulfillmentOutput {
            order_id: Some(order.order_id.clone()),
            status: "shipping_failed".to_string(),
            wave_id,
            path_id,
            tracking_number: Some(slam.tracking_number),
            error: shipping.error,
            ..Default::default()
        };
    }

    let unit_tracking = !planning.reserved_unit_ids.is_empty();
    let partial_success = unit_tracking && shipping.completed_units > 0 && shipping.failed_units > 0;
    let status = if partial_success { "partial_success" } else { "completed" };

    OrderFulfillmentOutput {
        order_id: Some(order.order_id),
        status: status.to_string(),
        tracking_number: Some(slam.tracking_number),
        wave_id,
        path_id,
        completed_units: unit_tracking.then_some(shipping.completed_units),
        failed_units: unit_tracking.then_some(shipping.failed_units),
        exception_ids: vec![],
        partial_success,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activities::planning::*;
    use crate::engine::test_context::TestWorkflowContext;
    use crate::types::allocation::WaveAssignment;
    use crate::types::ids::{AllocationId, CarrierId, ChuteId, ManifestId, PackageId, StationId, TaskId, UnitId};
    use crate::types::order::{OrderItem, Priority};
    use chrono::Utc;

    fn sample_order() -> OrderRequest {
        OrderRequest {
            order_id: OrderId::new("ORD-001"),
            customer_id: crate::types::ids::CustomerId::new("CUST-1"),
            priority: Priority::Standard,
            promised_delivery_at: Utc::now(),
            is_multi_item: false,
            total_value: 25.0,
            items: vec![OrderItem {
                sku: crate::types::ids::Sku::new("SKU-A"),
                quantity: 1,
                weight: 1.5,
                is_fragile: false,
                is_hazmat: false,
                requires_cold_chain: false,
            }],
            gift_wrap: None,
            hazmat: None,
            cold_chain: None,
            unit_ids: None,
        }
    }

    #[tokio::test]
    async fn happy_path_single_item_completes() {
        let ctx = TestWorkflowContext::new();

        ctx.stub_activity("ValidateOrder", true);

        ctx.stub_activity(
            "DetermineProcessPath",
            DetermineProcessPathOutput {
                path_type: crate::types::process_path::PathType::PickPack,
                requirements: vec![],
                consolidation_required: false,
                gift_wrap_required: false,
                special_handling: vec![],
            },
        );
        ctx.stub_activity("PersistProcessPath", PersistProcessPathOutput { path_id: PathId::new("PATH-1") });
        ctx.stub_activity(
            "OptimizeStationSelection",
            OptimizeStationSelectionOutput { selected_station_id: StationId::new("ST-1"), score: 0.9, confidence: 0.9 },
        );
        ctx.stub_activity("ReserveStationCapacity", ());
        ctx.stub_activity(
            "ValidateWorkerCertification",
            ValidateWorkerCertificationOutput { sufficient: true, available_workers: 2 },
        );
        ctx.stub_activity(
            "ReserveUnits",
            ReserveUnitsOutput {
                reserved_unit_ids: vec![UnitId::new("UNIT-1")],
                failed_skus: vec![],
                reservation_id: crate::types::ids::ReservationId::new("UNIT-RES-1"),
            },
        );
        ctx.stub_activity("ReserveInventory", ReserveInventoryOutput { allocation_ids: vec![AllocationId::new("ALLOC-1")] });
        ctx.enqueue_signal("waveAssigned", WaveAssignment { wave_id: WaveId::new("WAVE-001"), scheduled_start: Utc::now() });
        ctx.stub_activity("AssignToWave", ());

        ctx.stub_activity(
            "ResolveExecutionPlan",
            crate::activities::wes::ResolveExecutionPlanOutput {
                path_type: crate::types::process_path::PathType::PickPack,
                stages: vec!["picking".to_string(), "packing".to_string()],
            },
        );
        ctx.stub_activity("CreateTaskRoute", crate::activities::wes::CreateTaskRouteOutput { route_id: crate::types::ids::RouteId::new("ROUTE-1") });
        ctx.stub_activity("AssignWorkerToStage", ());
        ctx.stub_activity("StartStage", ());
        ctx.stub_activity("CompleteStage", ());
        ctx.stub_activity("CreatePickTask", TaskId::new("TASK-1"));
        ctx.enqueue_signal(
            "pickCompleted",
            crate::types::allocation::PickResult {
                task_id: TaskId::new("TASK-1"),
                picked_items: vec![],
                allocation_ids: vec![],
                success: true,
                unit_ids: None,
            },
        );
        ctx.stub_activity("FetchReservationIds", crate::activities::picking::FetchReservationIdsOutput { reservation_ids: vec![] });
        ctx.stub_activity("StageInventory", crate::activities::picking::StageInventoryOutput { allocation_ids: vec![] });
        ctx.stub_activity("CreatePackTask", TaskId::new("TASK-2"));
        ctx.stub_activity("StartPackTask", ());
        ctx.stub_activity(
            "SelectPackagingMaterials",
            crate::activities::packing::SelectPackagingMaterialsOutput { package_id: PackageId::new("PKG-1") },
        );
        ctx.stub_activity("PackItems", ());
        ctx.stub_activity("WeighPackage", 1.5_f64);
        ctx.stub_activity(
            "GenerateShippingLabel",
            crate::activities::packing::GenerateShippingLabelOutput {
                tracking_number: TrackingNumber::new("TRK-1"),
                carrier: "ups".to_string(),
                label_url: "http://labels/1".to_string(),
            },
        );
        ctx.stub_activity("ApplyLabelToPackage", ());
        ctx.stub_activity("SealPackage", ());
        ctx.stub_activity("PackInventory", ());
        ctx.stub_activity("CompletePackTask", ());

        ctx.stub_activity(
            "ExecuteSLAM",
            order::ExecuteSlamOutput {
                tracking_number: TrackingNumber::new("TRK-1"),
                manifest_id: ManifestId::new("MAN-1"),
                actual_weight: 1.5,
                weight_variance_percent: 0.0,
                carrier_id: CarrierId::new("UPS"),
                destination: "94107".to_string(),
            },
        );
        ctx.stub_activity("MarkPacked", ());

        ctx.stub_activity("CreateSortationBatch", crate::types::ids::BatchId::new("BATCH-1"));
        ctx.stub_activity("AssignChute", ChuteId::new("CHUTE-1"));
        ctx.stub_activity("AddPackageToBatch", ());
        ctx.stub_activity("SortPackage", ());

        ctx.stub_activity("CreateShipment", ());
        ctx.stub_activity("ScanPackage", ());
        ctx.stub_activity("VerifyShippingLabel", true);
        ctx.stub_activity("PlaceOnOutboundDock", ChuteId::new("CHUTE-2"));
        ctx.stub_activity("AddToCarrierManifest", ManifestId::new("MAN-2"));
        ctx.stub_activity("MarkOrderShipped", ());
        ctx.stub_activity("ShipInventory", ());
        ctx.stub_activity("NotifyCustomerShipped", ());
        ctx.stub_activity("ConfirmUnitShipped", ());

        let output = orchestrate_order_fulfillment(&ctx, sample_order(), &WarehouseConfig::for_test()).await;

        assert_eq!(output.status, "completed");
        assert_eq!(output.tracking_number, Some(TrackingNumber::new("TRK-1")));
        assert_eq!(output.wave_id, Some(WaveId::new("WAVE-001")));
        assert_eq!(output.completed_units, Some(1));
        assert_eq!(output.failed_units, Some(0));
        assert!(!output.partial_success);
    }

    #[tokio::test]
    async fn mixed_unit_outcomes_yield_partial_success_status() {
        let ctx = TestWorkflowContext::new();

        ctx.stub_activity("ValidateOrder", true);

        ctx.stub_activity(
            "DetermineProcessPath",
            DetermineProcessPathOutput {
                path_type: crate::types::process_path::PathType::PickPack,
                requirements: vec![],
                consolidation_required: false,
                gift_wrap_required: false,
                special_handling: vec![],
            },
        );
        ctx.stub_activity("PersistProcessPath", PersistProcessPathOutput { path_id: PathId::new("PATH-1") });
        ctx.stub_activity(
            "OptimizeStationSelection",
            OptimizeStationSelectionOutput { selected_station_id: StationId::new("ST-1"), score: 0.9, confidence: 0.9 },
        );
        ctx.stub_activity("ReserveStationCapacity", ());
        ctx.stub_activity(
            "ValidateWorkerCertification",
            ValidateWorkerCertificationOutput { sufficient: true, available_workers: 2 },
        );
        ctx.stub_activity(
            "ReserveUnits",
            ReserveUnitsOutput {
                reserved_unit_ids: vec![UnitId::new("UNIT-1"), UnitId::new("UNIT-2")],
                failed_skus: vec![],
                reservation_id: crate::types::ids::ReservationId::new("UNIT-RES-1"),
            },
        );
        ctx.stub_activity("ReserveInventory", ReserveInventoryOutput { allocation_ids: vec![AllocationId::new("ALLOC-1")] });
        ctx.enqueue_signal("waveAssigned", WaveAssignment { wave_id: WaveId::new("WAVE-001"), scheduled_start: Utc::now() });
        ctx.stub_activity("AssignToWave", ());

        ctx.stub_activity(
            "ResolveExecutionPlan",
            crate::activities::wes::ResolveExecutionPlanOutput {
                path_type: crate::types::process_path::PathType::PickPack,
                stages: vec!["picking".to_string(), "packing".to_string()],
            },
        );
        ctx.stub_activity("CreateTaskRoute", crate::activities::wes::CreateTaskRouteOutput { route_id: crate::types::ids::RouteId::new("ROUTE-1") });
        ctx.stub_activity("AssignWorkerToStage", ());
        ctx.stub_activity("StartStage", ());
        ctx.stub_activity("CompleteStage", ());
        ctx.stub_activity("CreatePickTask", TaskId::new("TASK-1"));
        ctx.enqueue_signal(
            "pickCompleted",
            crate::types::allocation::PickResult {
                task_id: TaskId::new("TASK-1"),
                picked_items: vec![],
                allocation_ids: vec![],
                success: true,
                unit_ids: None,
            },
        );
        ctx.stub_activity("FetchReservationIds", crate::activities::picking::FetchReservationIdsOutput { reservation_ids: vec![] });
        ctx.stub_activity("StageInventory", crate::activities::picking::StageInventoryOutput { allocation_ids: vec![] });
        ctx.stub_activity("CreatePackTask", TaskId::new("TASK-2"));
        ctx.stub_activity("StartPackTask", ());
        ctx.stub_activity(
            "SelectPackagingMaterials",
            crate::activities::packing::SelectPackagingMaterialsOutput { package_id: PackageId::new("PKG-1") },
        );
        ctx.stub_activity("PackItems", ());
        ctx.stub_activity("WeighPackage", 1.5_f64);
        ctx.stub_activity(
            "GenerateShippingLabel",
            crate::activities::packing::GenerateShippingLabelOutput {
                tracking_number: TrackingNumber::new("TRK-1"),
                carrier: "ups".to_string(),
                label_url: "http://labels/1".to_string(),
            },
        );
        ctx.stub_activity("ApplyLabelToPackage", ());
        ctx.stub_activity("SealPackage", ());
        ctx.stub_activity("PackInventory", ());
        ctx.stub_activity("CompletePackTask", ());

        ctx.stub_activity(
            "ExecuteSLAM",
            order::ExecuteSlamOutput {
                tracking_number: TrackingNumber::new("TRK-1"),
                manifest_id: ManifestId::new("MAN-1"),
                actual_weight: 1.5,
                weight_variance_percent: 0.0,
                carrier_id: CarrierId::new("UPS"),
                destination: "94107".to_string(),
            },
        );
        ctx.stub_activity("MarkPacked", ());

        ctx.stub_activity("CreateSortationBatch", crate::types::ids::BatchId::new("BATCH-1"));
        ctx.stub_activity("AssignChute", ChuteId::new("CHUTE-1"));
        ctx.stub_activity("AddPackageToBatch", ());
        ctx.stub_activity("SortPackage", ());

        ctx.stub_activity("CreateShipment", ());
        ctx.stub_activity("ScanPackage", ());
        ctx.stub_activity("VerifyShippingLabel", true);
        ctx.stub_activity("PlaceOnOutboundDock", ChuteId::new("CHUTE-2"));
        ctx.stub_activity("AddToCarrierManifest", ManifestId::new("MAN-2"));
        ctx.stub_activity("MarkOrderShipped", ());
        ctx.stub_activity("ShipInventory", ());
        ctx.stub_activity("NotifyCustomerShipped", ());
        ctx.stub_activity("ConfirmUnitShipped", ());
        ctx.stub_activity_error("ConfirmUnitShipped", crate::error::ActivityError::Transient("down".into()));

        let output = orchestrate_order_fulfillment(&ctx, sample_order(), &WarehouseConfig::for_test()).await;

        assert_eq!(output.status, "partial_success");
        assert!(output.partial_success);
        assert_eq!(output.completed_units, Some(1));
        assert_eq!(output.failed_units, Some(1));
    }

    #[tokio::test]
    async fn validation_failure_short_circuits_planning() {
        let ctx = TestWorkflowContext::new();
        ctx.stub_activity("ValidateOrder", false);

        let output = orchestrate_order_fulfillment(&ctx, sample_order(), &WarehouseConfig::for_test()).await;

        assert_eq!(output.status, "validation_failed");
        assert_eq!(ctx.call_count("DetermineProcessPath"), 0);
    }

    #[test]
    fn snapshot_reports_progress_through_stages() {
        let order_id = OrderId::new("ORD-1");
        let s = snapshot_for(order_id.clone(), FulfillmentStage::WesExecution, None);
        assert_eq!(s.completed_stages, 2);
        assert_eq!(s.status, "in_progress");

        let done = snapshot_for(order_id, FulfillmentStage::Completed, None);
        assert_eq!(done.completion_percent, 100);
        assert_eq!(done.status, "completed");
    }
}
