//! Tagged sum types replacing the distilled spec's loosely-typed
//! dictionaries (§3.1).

use serde::{Deserialize, Serialize};

/// Per-item shortage classification (§4.4.7), a sum type rather than a
/// free-text reason string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortageReason {
    NotFound,
    Damaged,
    QuantityMismatch,
}

/// Closed equipment vocabulary backing the §4.2 requirement→equipment
/// table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentType {
    HazmatKit,
    HazmatPpe,
    ColdStorageUnit,
    TemperatureMonitor,
    Forklift,
    PalletJack,
    FragileHandlingKit,
    SecureContainer,
    GiftWrapStation,
}

/// Closed skill vocabulary backing the §4.2 requirement→skill table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillType {
    HazmatCertification,
    ColdChainHandling,
    HeavyLifting,
    FragileHandling,
    HighValueVerification,
    GiftWrapping,
}

/// Ordered escalation tiers walked by `DetermineEscalationTier` when
/// worker certification or station capacity falls short (§4.2 step 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationTier {
    Station,
    Zone,
    Facility,
}

impl EscalationTier {
    pub fn next(&self) -> Option<EscalationTier> {
        match self {
            EscalationTier::Station => Some(EscalationTier::Zone),
            EscalationTier::Zone => Some(EscalationTier::Facility),
            EscalationTier::Facility => None,
        }
    }
}
