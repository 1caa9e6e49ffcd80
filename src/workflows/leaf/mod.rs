//! Single-purpose leaf workflows (§4.4): each owns one stage of
//! fulfillment and is started as a child workflow from
//! [`crate::workflows::wes_execution`] or
//! [`crate::workflows::order_fulfillment`].

pub mod backorder_fulfillment;
pub mod cancellation;
pub mod consolidation;
pub mod gift_wrap;
pub mod packing;
pub mod picking;
pub mod shipping;
pub mod sortation;
pub mod stock_shortage;
