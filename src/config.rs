//! System configuration parameters
//!
//! All tunable parameters for the tank controller.  Defaults reproduce the
//! original board; a JSON document can override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Timing ---
    /// Dispatcher period (milliseconds).  Also the tick unit of every timer.
    pub cycle_period_ms: u32,
    /// Measurement settle timer (seconds)
    pub measure_timer_secs: u32,
    /// Stabilization timer after an emergency stop (seconds)
    pub stabilization_timer_secs: u32,

    // --- Level register ---
    /// Empty boundary
    pub level_min: f32,
    /// Full boundary
    pub level_max: f32,
    /// Register value at boot
    pub initial_level: f32,
    /// Anti-oscillation nudge applied by the empty/full checks
    pub boundary_nudge: f32,
    /// Delay inside each drain/fill step (milliseconds)
    pub step_delay_ms: u32,
    /// Lock acquisition limit (milliseconds).  `None` blocks forever.
    pub lock_timeout_ms: Option<u32>,

    // --- Runtime ---
    /// Run every level operation once on its own thread at boot.
    pub boot_workers: bool,
    /// Emit a telemetry event every N cycles (0 disables).
    pub telemetry_interval_cycles: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Timing
            cycle_period_ms: 200, // 5 Hz
            measure_timer_secs: 1,
            stabilization_timer_secs: 5,

            // Level register
            level_min: 0.0,
            level_max: 10.0,
            initial_level: 0.0,
            boundary_nudge: 0.001,
            step_delay_ms: 2,
            lock_timeout_ms: None,

            // Runtime
            boot_workers: false,
            telemetry_interval_cycles: 25, // every 5 s at 200 ms
        }
    }
}

impl SystemConfig {
    /// Parse a (possibly partial) JSON document.  Missing fields keep
    /// their defaults; the result is validated before it is returned.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the controller misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cycle_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("cycle_period_ms must be > 0"));
        }
        if self.measure_timer_secs == 0 || self.stabilization_timer_secs == 0 {
            return Err(ConfigError::ValidationFailed("timer durations must be > 0"));
        }
        if !(self.level_min < self.level_max) {
            return Err(ConfigError::ValidationFailed("level_min must be below level_max"));
        }
        if !(self.level_min..=self.level_max).contains(&self.initial_level) {
            return Err(ConfigError::ValidationFailed("initial_level outside bounds"));
        }
        if !(self.boundary_nudge > 0.0 && self.boundary_nudge < 1.0) {
            return Err(ConfigError::ValidationFailed("boundary_nudge must be in (0, 1)"));
        }
        if self.lock_timeout_ms == Some(0) {
            return Err(ConfigError::ValidationFailed("lock_timeout_ms must be > 0"));
        }
        Ok(())
    }

    /// Convert a duration in whole seconds into dispatcher ticks.
    pub fn ticks_for(&self, secs: u32) -> u32 {
        secs.saturating_mul(1000) / self.cycle_period_ms
    }

    pub fn measure_ticks(&self) -> u32 {
        self.ticks_for(self.measure_timer_secs)
    }

    pub fn stabilization_ticks(&self) -> u32 {
        self.ticks_for(self.stabilization_timer_secs)
    }
}
