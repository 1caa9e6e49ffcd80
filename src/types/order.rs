//! Order request and its handling-bundle subtypes (§3).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{CustomerId, OrderId, Sku, UnitId};

/// Order priority. Drives wave-assignment and signal-wait timeouts
/// throughout Planning and the leaf workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    SameDay,
    NextDay,
    Standard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub sku: Sku,
    pub quantity: u32,
    pub weight: f64,
    pub is_fragile: bool,
    pub is_hazmat: bool,
    pub requires_cold_chain: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiftWrapRequest {
    pub wrap_type: String,
    pub gift_message: Option<String>,
    pub hide_price: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazmatDetails {
    pub class: String,
    pub un_number: String,
    pub packing_group: String,
    pub proper_shipping_name: String,
    pub limited_quantity: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColdChainDetails {
    pub min_temp_c: f64,
    pub max_temp_c: f64,
    pub requires_dry_ice: bool,
    pub requires_gel_pack: bool,
}

/// Immutable input to the `OrderFulfillment` saga (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub priority: Priority,
    pub promised_delivery_at: DateTime<Utc>,
    pub is_multi_item: bool,
    pub total_value: f64,
    pub items: Vec<OrderItem>,
    pub gift_wrap: Option<GiftWrapRequest>,
    pub hazmat: Option<HazmatDetails>,
    pub cold_chain: Option<ColdChainDetails>,
    pub unit_ids: Option<Vec<UnitId>>,
}

impl OrderRequest {
    pub fn item_count(&self) -> usize {
        self.items.iter().map(|i| i.quantity as usize).sum()
    }

    pub fn has_fragile(&self) -> bool {
        self.items.iter().any(|i| i.is_fragile)
    }

    pub fn has_hazmat(&self) -> bool {
        self.hazmat.is_some() || self.items.iter().any(|i| i.is_hazmat)
    }

    pub fn has_cold_chain(&self) -> bool {
        self.cold_chain.is_some() || self.items.iter().any(|i| i.requires_cold_chain)
    }

    pub fn has_gift_wrap(&self) -> bool {
        self.gift_wrap.is_some()
    }
}
