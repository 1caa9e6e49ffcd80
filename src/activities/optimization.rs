//! ContinuousOptimization activities (§4.6).

use serde::{Deserialize, Serialize};

use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::error::ActivityError;

#[derive(Debug, Clone, Serialize)]
pub struct MonitorSystemHealthInput {
    pub facility_id: String,
    pub zone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitorSystemHealthOutput {
    pub system_health: f64,
    pub rebalancing_recommended: bool,
    pub rerouting_opportunities: u32,
}

pub async fn monitor_system_health<C: WorkflowContext>(
    ctx: &C,
    input: MonitorSystemHealthInput,
    options: &ActivityOptions,
) -> Result<MonitorSystemHealthOutput, ActivityError> {
    ctx.execute_activity("MonitorSystemHealth", input, options).await
}

#[derive(Debug, Clone, Serialize)]
pub struct RebalanceWavesInput {
    pub facility_id: String,
    pub max_orders: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RebalanceWavesOutput {
    pub orders_rebalanced: u32,
}

pub async fn rebalance_waves<C: WorkflowContext>(
    ctx: &C,
    input: RebalanceWavesInput,
    options: &ActivityOptions,
) -> Result<RebalanceWavesOutput, ActivityError> {
    ctx.execute_activity("RebalanceWaves", input, options).await
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriggerDynamicReroutingOutput {
    pub orders_rerouted: u32,
}

pub async fn trigger_dynamic_rerouting<C: WorkflowContext>(
    ctx: &C,
    facility_id: String,
    options: &ActivityOptions,
) -> Result<TriggerDynamicReroutingOutput, ActivityError> {
    ctx.execute_activity("TriggerDynamicRerouting", facility_id, options).await
}

pub async fn predict_capacity_needs<C: WorkflowContext>(
    ctx: &C,
    facility_id: String,
    options: &ActivityOptions,
) -> Result<(), ActivityError> {
    ctx.execute_activity("PredictCapacityNeeds", facility_id, &options.clone().best_effort()).await
}
