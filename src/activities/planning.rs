//! Planning activities (§4.2): process-path derivation, station and
//! equipment reservation, worker certification, and escalation.

use serde::{Deserialize, Serialize};

use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::error::ActivityError;
use crate::types::ids::{AllocationId, OrderId, PathId, ReservationId, Sku, StationId, UnitId};
use crate::types::order::{ColdChainDetails, GiftWrapRequest, HazmatDetails, OrderItem};
use crate::types::process_path::{PathType, Requirement};
use crate::types::tags::{EquipmentType, EscalationTier, SkillType};

#[derive(Debug, Clone, Serialize)]
pub struct DetermineProcessPathInput<'a> {
    pub order_id: &'a OrderId,
    pub items: &'a [OrderItem],
    pub gift_wrap: &'a Option<GiftWrapRequest>,
    pub total_value: f64,
    pub hazmat: &'a Option<HazmatDetails>,
    pub cold_chain: &'a Option<ColdChainDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetermineProcessPathOutput {
    pub path_type: PathType,
    pub requirements: Vec<Requirement>,
    pub consolidation_required: bool,
    pub gift_wrap_required: bool,
    pub special_handling: Vec<String>,
}

pub async fn determine_process_path<C: WorkflowContext>(
    ctx: &C,
    input: DetermineProcessPathInput<'_>,
    options: &ActivityOptions,
) -> Result<DetermineProcessPathOutput, ActivityError> {
    ctx.execute_activity("DetermineProcessPath", input, options).await
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersistProcessPathOutput {
    pub path_id: PathId,
}

pub async fn persist_process_path<C: WorkflowContext>(
    ctx: &C,
    path_type: PathType,
    requirements: &[Requirement],
    options: &ActivityOptions,
) -> Result<PersistProcessPathOutput, ActivityError> {
    #[derive(Serialize)]
    struct Input<'a> {
        path_type: PathType,
        requirements: &'a [Requirement],
    }
    ctx.execute_activity("PersistProcessPath", Input { path_type, requirements }, options).await
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizeStationSelectionInput<'a> {
    pub requirements: &'a [Requirement],
    pub station_type: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptimizeStationSelectionOutput {
    pub selected_station_id: StationId,
    pub score: f64,
    pub confidence: f64,
}

pub async fn optimize_station_selection<C: WorkflowContext>(
    ctx: &C,
    input: OptimizeStationSelectionInput<'_>,
    options: &ActivityOptions,
) -> Result<OptimizeStationSelectionOutput, ActivityError> {
    ctx.execute_activity("OptimizeStationSelection", input, options).await
}

#[derive(Debug, Clone, Deserialize)]
pub struct FindCapableStationOutput {
    pub station_id: StationId,
}

pub async fn find_capable_station<C: WorkflowContext>(
    ctx: &C,
    requirements: &[Requirement],
    station_type: &str,
    options: &ActivityOptions,
) -> Result<FindCapableStationOutput, ActivityError> {
    #[derive(Serialize)]
    struct Input<'a> {
        requirements: &'a [Requirement],
        station_type: &'a str,
    }
    ctx.execute_activity("FindCapableStation", Input { requirements, station_type }, options).await
}

#[derive(Debug, Clone, Serialize)]
pub struct ReserveStationCapacityInput {
    pub station_id: StationId,
    pub order_id: OrderId,
    pub required_slots: u32,
    pub reservation_id: ReservationId,
}

pub async fn reserve_station_capacity<C: WorkflowContext>(
    ctx: &C,
    input: ReserveStationCapacityInput,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("ReserveStationCapacity", input, options).await
}

/// `requiredSlots` table (§4.2 step 4): 1 base, +1 if itemCount>5, +2 if
/// itemCount>10, plus one surcharge slot per requirement, capped at 5.
pub fn required_slots(item_count: usize, requirements: &[Requirement]) -> u32 {
    let mut slots = 1u32;
    if item_count > 10 {
        slots += 2;
    } else if item_count > 5 {
        slots += 1;
    }
    slots += requirements.len() as u32;
    slots.min(5)
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidateWorkerCertificationInput<'a> {
    pub required_skills: &'a [SkillType],
    pub zone: &'a str,
    pub min_workers: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateWorkerCertificationOutput {
    pub sufficient: bool,
    pub available_workers: u32,
}

pub async fn validate_worker_certification<C: WorkflowContext>(
    ctx: &C,
    input: ValidateWorkerCertificationInput<'_>,
    options: &ActivityOptions,
) -> Result<ValidateWorkerCertificationOutput, ActivityError> {
    ctx.execute_activity("ValidateWorkerCertification", input, options).await
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetermineEscalationTierOutput {
    pub tier: EscalationTier,
}

pub async fn determine_escalation_tier<C: WorkflowContext>(
    ctx: &C,
    current_tier: Option<EscalationTier>,
    options: &ActivityOptions,
) -> Result<DetermineEscalationTierOutput, ActivityError> {
    ctx.execute_activity("DetermineEscalationTier", current_tier, options).await
}

#[derive(Debug, Clone, Serialize)]
pub struct EscalateProcessPathInput {
    pub path_id: PathId,
    pub tier: EscalationTier,
}

pub async fn escalate_process_path<C: WorkflowContext>(
    ctx: &C,
    input: EscalateProcessPathInput,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("EscalateProcessPath", input, options).await
}

#[derive(Debug, Clone, Deserialize)]
pub struct FindFallbackStationsOutput {
    pub station_ids: Vec<StationId>,
}

pub async fn find_fallback_stations<C: WorkflowContext>(
    ctx: &C,
    tier: EscalationTier,
    options: &ActivityOptions,
) -> Result<FindFallbackStationsOutput, ActivityError> {
    ctx.execute_activity("FindFallbackStations", tier, options).await
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckEquipmentAvailabilityOutput {
    pub available_types: Vec<EquipmentType>,
}

pub async fn check_equipment_availability<C: WorkflowContext>(
    ctx: &C,
    equipment_types: &[EquipmentType],
    options: &ActivityOptions,
) -> Result<CheckEquipmentAvailabilityOutput, ActivityError> {
    ctx.execute_activity("CheckEquipmentAvailability", equipment_types.to_vec(), options).await
}

#[derive(Debug, Clone, Serialize)]
pub struct ReserveEquipmentInput {
    pub equipment_type: EquipmentType,
    pub order_id: OrderId,
    pub quantity: u32,
    pub reservation_id: ReservationId,
}

pub async fn reserve_equipment<C: WorkflowContext>(
    ctx: &C,
    input: ReserveEquipmentInput,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("ReserveEquipment", input, options).await
}

#[derive(Debug, Clone, Serialize)]
pub struct ReserveUnitsInput<'a> {
    pub order_id: &'a OrderId,
    pub path_id: &'a PathId,
    pub items: &'a [OrderItem],
    pub handler_id: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReserveUnitsOutput {
    pub reserved_unit_ids: Vec<UnitId>,
    pub failed_skus: Vec<Sku>,
    pub reservation_id: ReservationId,
}

pub async fn reserve_units<C: WorkflowContext>(
    ctx: &C,
    input: ReserveUnitsInput<'_>,
    options: &ActivityOptions,
) -> Result<ReserveUnitsOutput, ActivityError> {
    ctx.execute_activity("ReserveUnits", input, options).await
}

#[derive(Debug, Clone, Serialize)]
pub struct ReserveInventoryInput<'a> {
    pub order_id: &'a OrderId,
    pub items: &'a [OrderItem],
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReserveInventoryOutput {
    pub allocation_ids: Vec<AllocationId>,
}

pub async fn reserve_inventory<C: WorkflowContext>(
    ctx: &C,
    input: ReserveInventoryInput<'_>,
    options: &ActivityOptions,
) -> Result<ReserveInventoryOutput, ActivityError> {
    ctx.execute_activity("ReserveInventory", input, options).await
}

pub async fn assign_to_wave<C: WorkflowContext>(
    ctx: &C,
    order_id: OrderId,
    wave_id: crate::types::ids::WaveId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    #[derive(Serialize)]
    struct Input {
        order_id: OrderId,
        wave_id: crate::types::ids::WaveId,
    }
    ctx.execute_activity("AssignToWave", Input { order_id, wave_id }, &options.clone().best_effort()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_slots_matches_surcharge_table() {
        assert_eq!(required_slots(3, &[]), 1);
        assert_eq!(required_slots(7, &[]), 2);
        assert_eq!(required_slots(12, &[]), 3);
        assert_eq!(
            required_slots(12, &[Requirement::Hazmat, Requirement::ColdChain, Requirement::Fragile]),
            5
        );
    }
}
