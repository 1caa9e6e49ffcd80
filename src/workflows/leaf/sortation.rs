//! Sortation leaf workflow (§4.4.6), one instance per package, batched
//! by `{sortationCenter, destinationGroup, carrierId}`.

use serde::{Deserialize, Serialize};

use crate::activities::sortation;
use crate::config::WarehouseConfig;
use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::types::ids::{CarrierId, ChuteId, PackageId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortationInput {
    pub sortation_center: String,
    pub destination_zip: String,
    pub carrier_id: CarrierId,
    pub package_id: PackageId,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SortationOutput {
    pub success: bool,
    pub chute_id: Option<ChuteId>,
    pub error: Option<String>,
}

#[tracing::instrument(skip_all, fields(%input.package_id))]
pub async fn orchestrate_sortation<C: WorkflowContext>(
    ctx: &C,
    input: SortationInput,
    config: &WarehouseConfig,
) -> SortationOutput {
    let options = ActivityOptions::from_config(config);
    let group = sortation::destination_group(&input.destination_zip);

    let batch_id = match sortation::create_sortation_batch(
        ctx,
        sortation::CreateSortationBatchInput {
            sortation_center: &input.sortation_center,
            destination_group: group,
            carrier_id: &input.carrier_id,
        },
        &options,
    )
    .await
    {
        Ok(id) => id,
        Err(e) => return SortationOutput { success: false, error: Some(e.to_string()), ..Default::default() },
    };

    let chute_id = match sortation::assign_chute(ctx, batch_id.clone(), &options).await {
        Ok(id) => id,
        Err(e) => return SortationOutput { success: false, error: Some(e.to_string()), ..Default::default() },
    };

    if let Err(e) = sortation::add_package_to_batch(
        ctx,
        sortation::AddPackageToBatchInput { batch_id, package_id: input.package_id.clone() },
        &options,
    )
    .await
    {
        return SortationOutput { success: false, error: Some(e.to_string()), ..Default::default() };
    }

    if let Err(e) = sortation::sort_package(ctx, input.package_id, &options).await {
        return SortationOutput { success: false, error: Some(e.to_string()), ..Default::default() };
    }

    SortationOutput { success: true, chute_id: Some(chute_id), error: None }
}
