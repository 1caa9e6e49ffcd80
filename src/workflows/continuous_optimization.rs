//! ContinuousOptimization workflow (§4.6): an indefinite monitoring
//! loop, one cycle per `monitoring_interval`, stopped only by an
//! explicit `stop-optimization` signal.

use serde::{Deserialize, Serialize};

use crate::activities::optimization::{self, MonitorSystemHealthInput, RebalanceWavesInput};
use crate::config::WarehouseConfig;
use crate::engine::context::WorkflowContext;
use crate::engine::options::ActivityOptions;
use crate::engine::select::{select2, Either};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContinuousOptimizationInput {
    pub facility_id: String,
    pub zone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContinuousOptimizationOutput {
    pub total_cycles_run: u64,
    pub total_rebalancing_events: u64,
    pub total_rerouting_events: u64,
    pub total_orders_rebalanced: u64,
    pub total_orders_rerouted: u64,
    pub average_system_health: f64,
    pub last_cycle_health: Option<f64>,
}

#[tracing::instrument(skip_all, fields(facility_id = %input.facility_id))]
pub async fn orchestrate_continuous_optimization<C: WorkflowContext>(
    ctx: &C,
    input: ContinuousOptimizationInput,
    config: &WarehouseConfig,
) -> ContinuousOptimizationOutput {
    let options = ActivityOptions::from_config(config);
    let interval = std::time::Duration::from_secs(config.optimization.monitoring_interval_secs);

    let mut output = ContinuousOptimizationOutput::default();
    let mut health_sum = 0.0_f64;

    loop {
        match optimization::monitor_system_health(
            ctx,
            MonitorSystemHealthInput { facility_id: input.facility_id.clone(), zone: input.zone.clone() },
            &options,
        )
        .await
        {
            Ok(health) => {
                output.total_cycles_run += 1;
                health_sum += health.system_health;
                output.average_system_health = health_sum / output.total_cycles_run as f64;
                output.last_cycle_health = Some(health.system_health);

                if health.rebalancing_recommended && config.optimization.enable_auto_rebalancing {
                    match optimization::rebalance_waves(
                        ctx,
                        RebalanceWavesInput {
                            facility_id: input.facility_id.clone(),
                            max_orders: config.optimization.max_orders_per_rebalance,
                        },
                        &options,
                    )
                    .await
                    {
                        Ok(out) => {
                            output.total_rebalancing_events += 1;
                            output.total_orders_rebalanced += out.orders_rebalanced as u64;
                        }
                        Err(e) => tracing::warn!(error = %e, "RebalanceWaves failed, continuing"),
                    }
                }

                if health.rerouting_opportunities > 0 && config.optimization.enable_auto_rerouting {
                    match optimization::trigger_dynamic_rerouting(ctx, input.facility_id.clone(), &options).await {
                        Ok(out) => {
                            output.total_rerouting_events += 1;
                            output.total_orders_rerouted += out.orders_rerouted as u64;
                        }
                        Err(e) => tracing::warn!(error = %e, "TriggerDynamicRerouting failed, continuing"),
                    }
                }

                if config.optimization.enable_capacity_prediction {
                    if let Err(e) = optimization::predict_capacity_needs(ctx, input.facility_id.clone(), &options).await {
                        tracing::warn!(error = %e, "PredictCapacityNeeds failed, continuing");
                    }
                }
            }
            Err(e) => {
                output.total_cycles_run += 1;
                tracing::warn!(error = %e, "MonitorSystemHealth failed, continuing");
            }
        }

        match select2(ctx.wait_for_signal::<()>("stop-optimization"), ctx.new_timer(interval)).await {
            Either::Left(()) => break,
            Either::Right(()) => continue,
        }
    }

    output
}
