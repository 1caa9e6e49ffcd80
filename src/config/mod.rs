//! Layered application configuration (YAML file + `WMS_`-prefixed
//! environment variables), mirroring the reference framework's
//! `config.yaml` + `ANGZARR_` convention.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::order::Priority;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
/// Environment variable carrying an explicit config file path.
pub const CONFIG_ENV_VAR: &str = "WMS_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "WMS";
/// Environment variable consulted by `init_tracing`.
pub const LOG_ENV_VAR: &str = "WMS_LOG";

/// `startToClose`/`scheduleToClose`/heartbeat bundle attached to an
/// activity invocation (§4.1).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ActivityTimeouts {
    pub schedule_to_close_secs: u64,
    pub start_to_close_secs: u64,
    pub heartbeat_secs: u64,
}

impl Default for ActivityTimeouts {
    fn default() -> Self {
        Self {
            schedule_to_close_secs: 30 * 60,
            start_to_close_secs: 5 * 60,
            heartbeat_secs: 30,
        }
    }
}

impl ActivityTimeouts {
    pub fn schedule_to_close(&self) -> Duration {
        Duration::from_secs(self.schedule_to_close_secs)
    }

    pub fn start_to_close(&self) -> Duration {
        Duration::from_secs(self.start_to_close_secs)
    }

    pub fn heartbeat(&self) -> Duration {
        Duration::from_secs(self.heartbeat_secs)
    }
}

/// Exponential backoff preset (§4.1).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryPolicyConfig {
    pub max_attempts: u32,
    pub initial_interval_secs: u64,
    pub backoff_coefficient: f64,
    pub max_interval_secs: u64,
}

impl Default for RetryPolicyConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_interval_secs: 1,
            backoff_coefficient: 2.0,
            max_interval_secs: 60,
        }
    }
}

/// Wave-wait timeout minutes, keyed by priority (§4.2 step 9).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WaveTimeoutsConfig {
    pub same_day_minutes: u64,
    pub next_day_minutes: u64,
    pub standard_minutes: u64,
}

impl Default for WaveTimeoutsConfig {
    fn default() -> Self {
        Self {
            same_day_minutes: 30,
            next_day_minutes: 120,
            standard_minutes: 240,
        }
    }
}

impl WaveTimeoutsConfig {
    pub fn for_priority(&self, priority: Priority) -> Duration {
        let minutes = match priority {
            Priority::SameDay => self.same_day_minutes,
            Priority::NextDay => self.next_day_minutes,
            Priority::Standard => self.standard_minutes,
        };
        Duration::from_secs(minutes * 60)
    }
}

/// Reprocessing batch defaults (§4.5).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReprocessingConfig {
    pub default_batch_size: u32,
    pub max_retries: u32,
    pub max_workflows_per_continuation: u32,
}

impl Default for ReprocessingConfig {
    fn default() -> Self {
        Self {
            default_batch_size: 1000,
            max_retries: 3,
            max_workflows_per_continuation: 1000,
        }
    }
}

/// ContinuousOptimization defaults (§4.6).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OptimizationDefaults {
    pub monitoring_interval_secs: u64,
    pub capacity_threshold: f64,
    pub underutilization_threshold: f64,
    pub max_orders_per_rebalance: u32,
    pub enable_auto_rebalancing: bool,
    pub enable_auto_rerouting: bool,
    pub enable_capacity_prediction: bool,
}

impl Default for OptimizationDefaults {
    fn default() -> Self {
        Self {
            monitoring_interval_secs: 5 * 60,
            capacity_threshold: 0.85,
            underutilization_threshold: 0.30,
            max_orders_per_rebalance: 50,
            enable_auto_rebalancing: true,
            enable_auto_rerouting: true,
            enable_capacity_prediction: true,
        }
    }
}

/// Shipping-leaf tunables, including the resolved Open Question (b):
/// auto-confirm is opt-in via `auto_confirm_after`, defaulting to
/// `Some(5s)` here for test/dev. Production deployments should set this
/// to `None` in their config file so Shipping waits indefinitely for an
/// explicit `shipConfirmed`/`packageScanned` signal.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShippingConfig {
    pub auto_confirm_after_secs: Option<u64>,
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self {
            auto_confirm_after_secs: Some(5),
        }
    }
}

impl ShippingConfig {
    pub fn auto_confirm_after(&self) -> Option<Duration> {
        self.auto_confirm_after_secs.map(Duration::from_secs)
    }
}

/// Aggregate configuration for the orchestration core.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WarehouseConfig {
    pub facility_id: String,
    pub activity_timeouts: ActivityTimeouts,
    pub retry_policy: RetryPolicyConfig,
    pub wave_timeouts: WaveTimeoutsConfig,
    pub reprocessing: ReprocessingConfig,
    pub optimization: OptimizationDefaults,
    pub shipping: ShippingConfig,
}

impl WarehouseConfig {
    /// Load configuration from file and environment.
    ///
    /// Sources, in increasing priority:
    /// 1. `config.yaml` in the current directory (if present)
    /// 2. file named by `path`, when provided
    /// 3. file named by the `WMS_CONFIG` environment variable, when set
    /// 4. environment variables prefixed `WMS__`
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let built = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: WarehouseConfig = built.try_deserialize()?;
        Ok(config)
    }

    /// Configuration used by tests and local development.
    pub fn for_test() -> Self {
        Self::default()
    }
}
