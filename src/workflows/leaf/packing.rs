//! Packing leaf workflow (§4.4.2).

use serde::{Deserialize, Serialize};

use crate::activities::packing;
use crate::config::WarehouseConfig;
use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::types::ids::{OrderId, PackageId, TrackingNumber};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackingInput {
    pub order_id: OrderId,
    pub unit_ids: Vec<crate::types::ids::UnitId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PackingOutput {
    pub success: bool,
    pub package_id: Option<PackageId>,
    pub tracking_number: Option<TrackingNumber>,
    pub error: Option<String>,
}

impl PackingOutput {
    fn failure(msg: impl Into<String>) -> Self {
        Self { success: false, error: Some(msg.into()), ..Default::default() }
    }
}

#[tracing::instrument(skip_all, fields(%input.order_id))]
pub async fn orchestrate_packing<C: WorkflowContext>(
    ctx: &C,
    input: PackingInput,
    config: &WarehouseConfig,
) -> PackingOutput {
    let options = ActivityOptions::from_config(config);

    let task_id = match packing::create_pack_task(ctx, input.order_id.clone(), &options).await {
        Ok(id) => id,
        Err(e) => return PackingOutput::failure(e.to_string()),
    };
    if let Err(e) = packing::start_pack_task(ctx, task_id.clone(), &options).await {
        return PackingOutput::failure(e.to_string());
    }

    let package_id = match packing::select_packaging_materials(ctx, task_id.clone(), &options).await {
        Ok(out) => out.package_id,
        Err(e) => return PackingOutput::failure(e.to_string()),
    };

    if let Err(e) = packing::pack_items(ctx, package_id.clone(), &options).await {
        return PackingOutput::failure(e.to_string());
    }
    if let Err(e) = packing::weigh_package(ctx, package_id.clone(), &options).await {
        return PackingOutput::failure(e.to_string());
    }

    let label = match packing::generate_shipping_label(ctx, package_id.clone(), &options).await {
        Ok(out) => out,
        Err(e) => return PackingOutput::failure(e.to_string()),
    };

    if let Err(e) = packing::apply_label_to_package(
        ctx,
        packing::ApplyLabelInput { package_id: package_id.clone(), label_url: label.label_url.clone() },
        &options,
    )
    .await
    {
        return PackingOutput::failure(e.to_string());
    }
    if let Err(e) = packing::seal_package(ctx, package_id.clone(), &options).await {
        return PackingOutput::failure(e.to_string());
    }

    if let Err(e) = packing::pack_inventory(ctx, input.order_id, &options).await {
        tracing::warn!(error = %e, "PackInventory failed, reconcilable");
    }
    for unit_id in input.unit_ids {
        if let Err(e) = packing::confirm_unit_packed(ctx, unit_id, &options).await {
            tracing::warn!(error = %e, "ConfirmUnitPacked failed, reconcilable");
        }
    }
    if let Err(e) = packing::complete_pack_task(ctx, task_id, &options).await {
        tracing::warn!(error = %e, "CompletePackTask failed, reconcilable");
    }

    PackingOutput { success: true, package_id: Some(package_id), tracking_number: Some(label.tracking_number), error: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_context::TestWorkflowContext;
    use crate::types::ids::TaskId;

    #[tokio::test]
    async fn full_chain_produces_tracking_number() {
        let ctx = TestWorkflowContext::new();
        ctx.stub_activity("CreatePackTask", TaskId::new("TASK-1"));
        ctx.stub_activity("StartPackTask", ());
        ctx.stub_activity(
            "SelectPackagingMaterials",
            packing::SelectPackagingMaterialsOutput { package_id: PackageId::new("PKG-1") },
        );
        ctx.stub_activity("PackItems", ());
        ctx.stub_activity("WeighPackage", 2.5_f64);
        ctx.stub_activity(
            "GenerateShippingLabel",
            packing::GenerateShippingLabelOutput {
                tracking_number: TrackingNumber::new("TRK-1"),
                carrier: "ups".to_string(),
                label_url: "http://labels/1".to_string(),
            },
        );
        ctx.stub_activity("ApplyLabelToPackage", ());
        ctx.stub_activity("SealPackage", ());
        ctx.stub_activity("PackInventory", ());
        ctx.stub_activity("CompletePackTask", ());

        let output = orchestrate_packing(
            &ctx,
            PackingInput { order_id: OrderId::new("ORD-1"), unit_ids: vec![] },
            &WarehouseConfig::for_test(),
        )
        .await;

        assert!(output.success);
        assert_eq!(output.tracking_number, Some(TrackingNumber::new("TRK-1")));
    }
}
