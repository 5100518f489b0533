//! Tunables for the simulated drive.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Latency, progress and failure parameters of the simulator.
///
/// Every field has a default, so a partial `[simulation]` table is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Delay before sign-in completes.
    #[serde(default = "default_auth_delay_ms")]
    pub auth_delay_ms: u64,
    /// Delay of list/create/delete calls.
    #[serde(default = "default_rpc_delay_ms")]
    pub rpc_delay_ms: u64,
    /// Interval between upload progress ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Upper bound of the progress gained per tick, in percentage points.
    #[serde(default = "default_max_progress_step")]
    pub max_progress_step: f64,
    /// Probability that a finished transfer is reported as failed.
    #[serde(default = "default_failure_rate")]
    pub failure_rate: f64,
    /// Start from the demo folders instead of an empty drive.
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,
}

fn default_auth_delay_ms() -> u64 {
    1000
}

fn default_rpc_delay_ms() -> u64 {
    800
}

fn default_tick_interval_ms() -> u64 {
    200
}

fn default_max_progress_step() -> f64 {
    20.0
}

fn default_failure_rate() -> f64 {
    0.1
}

fn default_seed_demo_data() -> bool {
    true
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            auth_delay_ms: default_auth_delay_ms(),
            rpc_delay_ms: default_rpc_delay_ms(),
            tick_interval_ms: default_tick_interval_ms(),
            max_progress_step: default_max_progress_step(),
            failure_rate: default_failure_rate(),
            seed_demo_data: default_seed_demo_data(),
        }
    }
}

impl SimulationSettings {
    pub fn auth_delay(&self) -> Duration {
        Duration::from_millis(self.auth_delay_ms)
    }

    pub fn rpc_delay(&self) -> Duration {
        Duration::from_millis(self.rpc_delay_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Copy with out-of-range values pulled back into their valid range.
    ///
    /// A non-positive step would never finish an upload, so it falls back to
    /// the default.
    pub fn sanitized(&self) -> Self {
        let step = self.max_progress_step;
        let max_progress_step = if step.is_finite() && step > 0.0 {
            step.min(100.0)
        } else {
            default_max_progress_step()
        };
        let failure_rate = if self.failure_rate.is_finite() {
            self.failure_rate.clamp(0.0, 1.0)
        } else {
            default_failure_rate()
        };

        Self {
            max_progress_step,
            failure_rate,
            ..self.clone()
        }
    }
}
