//! Planning workflow (§4.2): process-path determination, station and
//! equipment reservation, worker-certification escalation, unit and
//! inventory reservation, and the wave-assignment wait.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::activities::planning::{self, *};
use crate::compensation::{CompensationContext, ContextCompensationDispatcher, ReleaseAction};
use crate::config::WarehouseConfig;
use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::engine::select::{select2, Either};
use crate::types::allocation::WaveAssignment;
use crate::types::ids::{AllocationId, OrderId, PathId, ReservationId, StationId, UnitId, WaveId};
use crate::types::order::{ColdChainDetails, GiftWrapRequest, HazmatDetails, OrderItem, Priority};
use crate::types::process_path::{PathType, ZoneLayout};
use crate::types::tags::{EquipmentType, EscalationTier, SkillType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningInput {
    pub order_id: OrderId,
    pub priority: Priority,
    pub items: Vec<OrderItem>,
    pub zones: ZoneLayout,
    pub gift_wrap: Option<GiftWrapRequest>,
    pub hazmat: Option<HazmatDetails>,
    pub cold_chain: Option<ColdChainDetails>,
    pub total_value: f64,
    pub unit_ids: Option<Vec<UnitId>>,
    pub handler_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlanningOutput {
    pub path_type: Option<PathType>,
    pub path_id: Option<PathId>,
    pub wave_id: Option<WaveId>,
    pub wave_scheduled_start: Option<DateTime<Utc>>,
    pub reserved_unit_ids: Vec<UnitId>,
    pub target_station_id: Option<StationId>,
    pub required_skills: Vec<SkillType>,
    pub required_equipment: Vec<EquipmentType>,
    pub equipment_reserved: Vec<(EquipmentType, ReservationId)>,
    pub allocation_ids: Vec<AllocationId>,
    pub success: bool,
    pub error: Option<String>,
}

impl PlanningOutput {
    fn failure(error: impl Into<String>) -> Self {
        Self { success: false, error: Some(error.into()), ..Default::default() }
    }
}

#[tracing::instrument(skip_all, fields(%input.order_id, priority = ?input.priority))]
pub async fn orchestrate_planning<C: WorkflowContext>(
    ctx: &C,
    input: PlanningInput,
    config: &WarehouseConfig,
) -> PlanningOutput {
    let options = ActivityOptions::from_config(config);
    let mut comp = CompensationContext::new();

    let path = match planning::determine_process_path(
        ctx,
        DetermineProcessPathInput {
            order_id: &input.order_id,
            items: &input.items,
            gift_wrap: &input.gift_wrap,
            total_value: input.total_value,
            hazmat: &input.hazmat,
            cold_chain: &input.cold_chain,
        },
        &options,
    )
    .await
    {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(error = %e, "DetermineProcessPath failed");
            return PlanningOutput::failure(e.to_string());
        }
    };

    let path_id = match planning::persist_process_path(ctx, path.path_type, &path.requirements, &options).await {
        Ok(out) => out.path_id,
        Err(e) => {
            tracing::warn!(error = %e, "PersistProcessPath failed, synthesizing id");
            PathId::new(format!("path-{}", input.order_id))
        }
    };

    let required_skills: Vec<SkillType> =
        path.requirements.iter().flat_map(|r| crate::types::process_path::required_skills(*r).to_vec()).collect();
    let required_equipment: Vec<EquipmentType> =
        path.requirements.iter().flat_map(|r| crate::types::process_path::required_equipment(*r).to_vec()).collect();

    let station_type = "pick_pack";
    let station_id = match planning::optimize_station_selection(
        ctx,
        OptimizeStationSelectionInput { requirements: &path.requirements, station_type },
        &options,
    )
    .await
    {
        Ok(out) => Some(out.selected_station_id),
        Err(e) => {
            tracing::warn!(error = %e, "OptimizeStationSelection failed, falling back");
            match planning::find_capable_station(ctx, &path.requirements, station_type, &options).await {
                Ok(out) => Some(out.station_id),
                Err(e2) => {
                    tracing::warn!(error = %e2, "FindCapableStation also failed, proceeding without a station");
                    None
                }
            }
        }
    };

    let item_count = input.items.iter().map(|i| i.quantity as usize).sum();
    if let Some(station_id) = station_id.clone() {
        let reservation_id = ReservationId::new(Uuid::new_v4().to_string());
        let slots = planning::required_slots(item_count, &path.requirements);
        if let Err(e) = planning::reserve_station_capacity(
            ctx,
            ReserveStationCapacityInput {
                station_id: station_id.clone(),
                order_id: input.order_id.clone(),
                required_slots: slots,
                reservation_id: reservation_id.clone(),
            },
            &options,
        )
        .await
        {
            tracing::warn!(error = %e, "ReserveStationCapacity failed");
        } else {
            comp.hold(ReleaseAction::ReleaseStationCapacity { reservation_id });
        }
    }

    let mut tier = None;
    loop {
        let cert = match planning::validate_worker_certification(
            ctx,
            ValidateWorkerCertificationInput { required_skills: &required_skills, zone: "default", min_workers: 1 },
            &options,
        )
        .await
        {
            Ok(out) => out,
            Err(e) => {
                tracing::warn!(error = %e, "ValidateWorkerCertification failed");
                break;
            }
        };
        if cert.sufficient {
            break;
        }
        let next_tier = match planning::determine_escalation_tier(ctx, tier, &options).await {
            Ok(out) => out.tier,
            Err(_) => break,
        };
        tier = Some(next_tier);
        let _ = planning::escalate_process_path(ctx, EscalateProcessPathInput { path_id: path_id.clone(), tier: next_tier }, &options).await;
        if planning::find_fallback_stations(ctx, next_tier, &options).await.is_err() {
            break;
        }
        if next_tier == EscalationTier::Facility {
            break;
        }
    }

    let mut equipment_reserved: Vec<(EquipmentType, ReservationId)> = Vec::new();
    if !required_equipment.is_empty() {
        if let Ok(avail) = planning::check_equipment_availability(ctx, &required_equipment, &options).await {
            for equipment_type in avail.available_types {
                let reservation_id = ReservationId::new(Uuid::new_v4().to_string());
                if planning::reserve_equipment(
                    ctx,
                    ReserveEquipmentInput {
                        equipment_type,
                        order_id: input.order_id.clone(),
                        quantity: 1,
                        reservation_id: reservation_id.clone(),
                    },
                    &options,
                )
                .await
                .is_ok()
                {
                    comp.hold(ReleaseAction::ReleaseEquipment { reservation_id: reservation_id.clone() });
                    equipment_reserved.push((equipment_type, reservation_id));
                }
            }
        }
    }

    let reserved_unit_ids = if let Some(unit_ids) = input.unit_ids.clone() {
        unit_ids
    } else {
        match planning::reserve_units(
            ctx,
            ReserveUnitsInput { order_id: &input.order_id, path_id: &path_id, items: &input.items, handler_id: &input.handler_id },
            &options,
        )
        .await
        {
            Ok(out) => {
                if out.reserved_unit_ids.is_empty() && !input.items.is_empty() {
                    comp.run(&ContextCompensationDispatcher { ctx }, &options).await;
                    return PlanningOutput::failure("ReserveUnits: total failure");
                }
                comp.hold(ReleaseAction::ReleaseUnits { reservation_id: out.reservation_id });
                out.reserved_unit_ids
            }
            Err(e) => {
                comp.run(&ContextCompensationDispatcher { ctx }, &options).await;
                return PlanningOutput::failure(format!("ReserveUnits failed: {e}"));
            }
        }
    };

    let allocation_ids = match planning::reserve_inventory(
        ctx,
        ReserveInventoryInput { order_id: &input.order_id, items: &input.items },
        &options,
    )
    .await
    {
        Ok(out) => out.allocation_ids,
        Err(e) => {
            tracing::error!(error = %e, "ReserveInventory failed, compensating");
            comp.run(&ContextCompensationDispatcher { ctx }, &options).await;
            return PlanningOutput::failure(format!("ReserveInventory failed: {e}"));
        }
    };
    comp.hold(ReleaseAction::ReleaseInventoryReservation { order_id: input.order_id.clone() });

    let wave_timeout = config.wave_timeouts.for_priority(input.priority);
    let wave = match select2(
        ctx.wait_for_signal::<WaveAssignment>("waveAssigned"),
        ctx.new_timer(wave_timeout),
    )
    .await
    {
        Either::Left(assignment) => assignment,
        Either::Right(()) => {
            comp.run(&ContextCompensationDispatcher { ctx }, &options).await;
            return PlanningOutput::failure("wave_timeout");
        }
    };

    let _ = planning::assign_to_wave(ctx, input.order_id.clone(), wave.wave_id.clone(), &options).await;

    PlanningOutput {
        path_type: Some(path.path_type),
        path_id: Some(path_id),
        wave_id: Some(wave.wave_id),
        wave_scheduled_start: Some(wave.scheduled_start),
        reserved_unit_ids,
        target_station_id: station_id,
        required_skills,
        required_equipment,
        equipment_reserved,
        allocation_ids,
        success: true,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_context::TestWorkflowContext;

    fn sample_input() -> PlanningInput {
        PlanningInput {
            order_id: OrderId::new("ORD-001"),
            priority: Priority::Standard,
            items: vec![OrderItem {
                sku: crate::types::ids::Sku::new("SKU-A"),
                quantity: 1,
                weight: 1.0,
                is_fragile: false,
                is_hazmat: false,
                requires_cold_chain: false,
            }],
            zones: ZoneLayout::Single,
            gift_wrap: None,
            hazmat: None,
            cold_chain: None,
            total_value: 10.0,
            unit_ids: None,
            handler_id: "handler-1".to_string(),
        }
    }

    #[tokio::test]
    async fn wave_assigned_before_timeout_succeeds() {
        let ctx = TestWorkflowContext::new();
        ctx.stub_activity(
            "DetermineProcessPath",
            DetermineProcessPathOutput {
                path_type: PathType::PickPack,
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
                reservation_id: ReservationId::new("UNIT-RES-1"),
            },
        );
        ctx.stub_activity(
            "ReserveInventory",
            ReserveInventoryOutput { allocation_ids: vec![crate::types::ids::AllocationId::new("ALLOC-1")] },
        );
        ctx.enqueue_signal(
            "waveAssigned",
            WaveAssignment { wave_id: WaveId::new("WAVE-001"), scheduled_start: Utc::now() },
        );
        ctx.stub_activity("AssignToWave", ());

        let config = WarehouseConfig::for_test();
        let output = orchestrate_planning(&ctx, sample_input(), &config).await;

        assert!(output.success);
        assert_eq!(output.wave_id, Some(WaveId::new("WAVE-001")));
        assert_eq!(ctx.call_count("ReserveInventory"), 1);
    }

    #[tokio::test]
    async fn no_wave_signal_times_out() {
        let ctx = TestWorkflowContext::new();
        ctx.stub_activity(
            "DetermineProcessPath",
            DetermineProcessPathOutput {
                path_type: PathType::PickPack,
                requirements: vec![],
                consolidation_required: false,
                gift_wrap_required: false,
                special_handling: vec![],
            },
        );
        ctx.stub_activity("PersistProcessPath", PersistProcessPathOutput { path_id: PathId::new("PATH-1") });
        ctx.stub_activity_error("OptimizeStationSelection", crate::error::ActivityError::Transient("down".into()));
        ctx.stub_activity_error("FindCapableStation", crate::error::ActivityError::Transient("down".into()));
        ctx.stub_activity(
            "ValidateWorkerCertification",
            ValidateWorkerCertificationOutput { sufficient: true, available_workers: 2 },
        );
        ctx.stub_activity(
            "ReserveUnits",
            ReserveUnitsOutput {
                reserved_unit_ids: vec![UnitId::new("UNIT-1")],
                failed_skus: vec![],
                reservation_id: ReservationId::new("UNIT-RES-1"),
            },
        );
        ctx.stub_activity(
            "ReserveInventory",
            ReserveInventoryOutput { allocation_ids: vec![crate::types::ids::AllocationId::new("ALLOC-1")] },
        );
        ctx.stub_activity("ReleaseInventoryReservation", ());
        ctx.stub_activity("ReleaseUnits", ());

        let config = WarehouseConfig::for_test();
        let output = orchestrate_planning(&ctx, sample_input(), &config).await;

        assert!(!output.success);
        assert_eq!(output.error.as_deref(), Some("wave_timeout"));
        assert_eq!(ctx.call_count("ReleaseInventoryReservation"), 1);
        assert_eq!(ctx.call_count("ReleaseUnits"), 1);
    }

    #[tokio::test]
    async fn reserved_equipment_is_reported_in_output() {
        let ctx = TestWorkflowContext::new();
        ctx.stub_activity(
            "DetermineProcessPath",
            DetermineProcessPathOutput {
                path_type: PathType::PickPack,
                requirements: vec![crate::types::process_path::Requirement::Fragile],
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
            "CheckEquipmentAvailability",
            CheckEquipmentAvailabilityOutput { available_types: vec![EquipmentType::FragileHandlingKit] },
        );
        ctx.stub_activity("ReserveEquipment", ());
        ctx.stub_activity(
            "ReserveUnits",
            ReserveUnitsOutput {
                reserved_unit_ids: vec![UnitId::new("UNIT-1")],
                failed_skus: vec![],
                reservation_id: ReservationId::new("UNIT-RES-1"),
            },
        );
        ctx.stub_activity(
            "ReserveInventory",
            ReserveInventoryOutput { allocation_ids: vec![crate::types::ids::AllocationId::new("ALLOC-1")] },
        );
        ctx.enqueue_signal(
            "waveAssigned",
            WaveAssignment { wave_id: WaveId::new("WAVE-001"), scheduled_start: Utc::now() },
        );
        ctx.stub_activity("AssignToWave", ());

        let config = WarehouseConfig::for_test();
        let output = orchestrate_planning(&ctx, sample_input(), &config).await;

        assert!(output.success);
        assert_eq!(output.equipment_reserved.len(), 1);
        assert_eq!(output.equipment_reserved[0].0, EquipmentType::FragileHandlingKit);
    }
}
