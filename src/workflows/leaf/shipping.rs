//! Shipping (SLAM finalization) leaf workflow (§4.4.4).

use serde::{Deserialize, Serialize};

use crate::activities::shipping;
use crate::config::WarehouseConfig;
use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::engine::select::{select2, Either};
use crate::types::ids::{CarrierId, ChuteId, ManifestId, OrderId, PackageId, TrackingNumber, UnitId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingInput {
    pub order_id: OrderId,
    pub package_id: PackageId,
    pub tracking_number: TrackingNumber,
    pub carrier_id: CarrierId,
    pub unit_ids: Vec<UnitId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShippingOutput {
    pub success: bool,
    pub chute_id: Option<ChuteId>,
    pub manifest_id: Option<ManifestId>,
    pub completed_units: u32,
    pub failed_units: u32,
    pub error: Option<String>,
}

impl ShippingOutput {
    fn failure(msg: impl Into<String>) -> Self {
        Self { success: false, error: Some(msg.into()), ..Default::default() }
    }
}

/// Waits for an explicit `shipConfirmed` signal, or auto-confirms after
/// `config.shipping.auto_confirm_after` when one is configured (resolved
/// Open Question (b)).
async fn await_ship_confirmation<C: WorkflowContext>(ctx: &C, config: &WarehouseConfig) {
    match config.shipping.auto_confirm_after() {
        Some(timeout) => {
            let _ = select2(ctx.wait_for_signal::<()>("shipConfirmed"), ctx.new_timer(timeout)).await;
        }
        None => {
            ctx.wait_for_signal::<()>("shipConfirmed").await;
        }
    }
}

#[tracing::instrument(skip_all, fields(%input.order_id))]
pub async fn orchestrate_shipping<C: WorkflowContext>(
    ctx: &C,
    input: ShippingInput,
    config: &WarehouseConfig,
) -> ShippingOutput {
    let options = ActivityOptions::from_config(config);

    if let Err(e) = shipping::create_shipment(
        ctx,
        shipping::CreateShipmentInput { order_id: input.order_id.clone(), package_id: input.package_id.clone() },
        &options,
    )
    .await
    {
        return ShippingOutput::failure(e.to_string());
    }

    await_ship_confirmation(ctx, config).await;

    if let Err(e) = shipping::scan_package(ctx, input.package_id.clone(), &options).await {
        return ShippingOutput::failure(e.to_string());
    }

    let verified = match shipping::verify_shipping_label(
        ctx,
        shipping::VerifyShippingLabelInput {
            package_id: input.package_id.clone(),
            tracking_number: input.tracking_number,
        },
        &options,
    )
    .await
    {
        Ok(v) => v,
        Err(e) => return ShippingOutput::failure(e.to_string()),
    };
    if !verified {
        // Fatal on mismatch (§4.4.4) — not reconcilable after the fact.
        return ShippingOutput::failure("shipping label verification failed");
    }

    let chute_id = match shipping::place_on_outbound_dock(ctx, input.package_id.clone(), &options).await {
        Ok(c) => c,
        Err(e) => return ShippingOutput::failure(e.to_string()),
    };

    let manifest_id = match shipping::add_to_carrier_manifest(
        ctx,
        shipping::AddToCarrierManifestInput { package_id: input.package_id.clone(), carrier_id: input.carrier_id },
        &options,
    )
    .await
    {
        Ok(m) => m,
        Err(e) => return ShippingOutput::failure(e.to_string()),
    };

    if let Err(e) = shipping::mark_order_shipped(ctx, input.order_id.clone(), &options).await {
        return ShippingOutput::failure(e.to_string());
    }

    if let Err(e) = shipping::ship_inventory(ctx, input.order_id.clone(), &options).await {
        tracing::warn!(error = %e, "ShipInventory failed, reconcilable");
    }
    if let Err(e) = shipping::notify_customer_shipped(ctx, input.order_id, &options).await {
        tracing::warn!(error = %e, "NotifyCustomerShipped failed, reconcilable");
    }
    let mut completed_units = 0;
    let mut failed_units = 0;
    for unit_id in input.unit_ids {
        match shipping::confirm_unit_shipped(ctx, unit_id, &options).await {
            Ok(()) => completed_units += 1,
            Err(e) => {
                tracing::warn!(error = %e, "ConfirmUnitShipped failed, reconcilable");
                failed_units += 1;
            }
        }
    }

    ShippingOutput {
        success: true,
        chute_id: Some(chute_id),
        manifest_id: Some(manifest_id),
        completed_units,
        failed_units,
        error: None,
    }
}
