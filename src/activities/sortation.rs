//! Sortation activities (§4.4.6).

use serde::{Deserialize, Serialize};

use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::error::ActivityError;
use crate::types::ids::{BatchId, CarrierId, ChuteId, OrderId, PackageId};

/// Sortation batches are deduplicated by `{sortationCenter,
/// destinationGroup, carrierId}`, where `destinationGroup` is the first
/// three characters of the destination ZIP (§4.4.6).
pub fn destination_group(destination_zip: &str) -> &str {
    let end = destination_zip.char_indices().nth(3).map(|(i, _)| i).unwrap_or(destination_zip.len());
    &destination_zip[..end]
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateSortationBatchInput<'a> {
    pub sortation_center: &'a str,
    pub destination_group: &'a str,
    pub carrier_id: &'a CarrierId,
}

pub async fn create_sortation_batch<C: WorkflowContext>(
    ctx: &C,
    input: CreateSortationBatchInput<'_>,
    options: &ActivityOptions,
) -> Result<BatchId, ActivityError> {
    ctx.execute_activity("CreateSortationBatch", input, options).await
}

pub async fn assign_chute<C: WorkflowContext>(
    ctx: &C,
    batch_id: BatchId,
    options: &ActivityOptions,
) -> Result<ChuteId, ActivityError> {
    ctx.execute_activity("AssignChute", batch_id, options).await
}

#[derive(Debug, Clone, Serialize)]
pub struct AddPackageToBatchInput {
    pub batch_id: BatchId,
    pub package_id: PackageId,
}

pub async fn add_package_to_batch<C: WorkflowContext>(
    ctx: &C,
    input: AddPackageToBatchInput,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("AddPackageToBatch", input, options).await
}

pub async fn sort_package<C: WorkflowContext>(
    ctx: &C,
    package_id: PackageId,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("SortPackage", package_id, options).await
}

/// Batch-sortation variant: one activity call over a list of orders
/// rather than per-order child workflows.
pub async fn process_sortation<C: WorkflowContext>(
    ctx: &C,
    order_ids: Vec<OrderId>,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("ProcessSortation", order_ids, options).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_group_takes_first_three_chars() {
        assert_eq!(destination_group("94107"), "941");
        assert_eq!(destination_group("9"), "9");
    }
}
