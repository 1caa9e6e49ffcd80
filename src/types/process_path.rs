//! `ProcessPath` derived classification (§3, decision table §4.2).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::ids::{PathId, StationId};
use super::tags::{EquipmentType, SkillType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathType {
    PickPack,
    PickWallPack,
    MultiRoute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    MultiItem,
    Fragile,
    Hazmat,
    ColdChain,
    HighValue,
    Oversized,
    GiftWrap,
}

/// Zone topology of an order's items, used by the §4.2 decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneLayout {
    Single,
    Multi,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessPath {
    pub path_id: PathId,
    pub path_type: PathType,
    pub requirements: BTreeSet<Requirement>,
    pub consolidation_required: bool,
    pub gift_wrap_required: bool,
    pub special_handling: Vec<String>,
    pub target_station: Option<StationId>,
}

impl ProcessPath {
    /// `consolidationRequired` iff `itemCount >= 4` or multi-zone or
    /// multi-route (§3 invariant).
    pub fn consolidation_required_for(item_count: usize, zones: ZoneLayout, path_type: PathType) -> bool {
        item_count >= 4 || zones == ZoneLayout::Multi || path_type == PathType::MultiRoute
    }
}

/// Required skills/equipment tables keyed by requirement (§4.2, tagged
/// per §3.1 rather than compared as strings).
pub fn required_skills(requirement: Requirement) -> &'static [SkillType] {
    match requirement {
        Requirement::Hazmat => &[SkillType::HazmatCertification],
        Requirement::ColdChain => &[SkillType::ColdChainHandling],
        Requirement::Oversized => &[SkillType::HeavyLifting],
        Requirement::Fragile => &[SkillType::FragileHandling],
        Requirement::HighValue => &[SkillType::HighValueVerification],
        Requirement::GiftWrap => &[SkillType::GiftWrapping],
        Requirement::MultiItem => &[],
    }
}

pub fn required_equipment(requirement: Requirement) -> &'static [EquipmentType] {
    match requirement {
        Requirement::Hazmat => &[EquipmentType::HazmatKit, EquipmentType::HazmatPpe],
        Requirement::ColdChain => &[EquipmentType::ColdStorageUnit, EquipmentType::TemperatureMonitor],
        Requirement::Oversized => &[EquipmentType::Forklift, EquipmentType::PalletJack],
        Requirement::Fragile => &[EquipmentType::FragileHandlingKit],
        Requirement::HighValue => &[EquipmentType::SecureContainer],
        Requirement::GiftWrap => &[EquipmentType::GiftWrapStation],
        Requirement::MultiItem => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consolidation_required_on_item_count() {
        assert!(ProcessPath::consolidation_required_for(
            4,
            ZoneLayout::Single,
            PathType::PickWallPack
        ));
        assert!(!ProcessPath::consolidation_required_for(
            3,
            ZoneLayout::Single,
            PathType::PickPack
        ));
    }

    #[test]
    fn consolidation_required_on_multi_zone_or_multi_route() {
        assert!(ProcessPath::consolidation_required_for(
            1,
            ZoneLayout::Multi,
            PathType::PickWallPack
        ));
        assert!(ProcessPath::consolidation_required_for(
            1,
            ZoneLayout::Single,
            PathType::MultiRoute
        ));
    }
}
