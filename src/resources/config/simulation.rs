use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::physics::PhysicsConfig;
use crate::components::aircraft::config::ConfigError;

/// How the loop decides when to halt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RunMode {
    /// Step until stopped.
    RealTime,
    /// Step for a fixed simulated duration (s), then stop on its own.
    Analysis { duration: f64 },
}

impl Default for RunMode {
    fn default() -> Self {
        RunMode::RealTime
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub physics: PhysicsConfig,
    pub run_mode: RunMode,
    /// Sleep so that one step takes `dt` of wall-clock time. Analysis runs
    /// normally turn this off.
    pub pace_real_time: bool,
    pub join_timeout_ms: u64,
    /// Per-subscriber notification buffer.
    pub subscriber_buffer: usize,
    /// Oldest entries are dropped beyond this length.
    pub max_log_entries: Option<usize>,
    /// Reference point of the position placeholder (deg).
    pub initial_latitude: f64,
    pub initial_longitude: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            run_mode: RunMode::RealTime,
            pace_real_time: true,
            join_timeout_ms: 2_000,
            subscriber_buffer: 256,
            max_log_entries: None,
            initial_latitude: 0.0,
            initial_longitude: 0.0,
        }
    }
}

impl SimulationConfig {
    /// Unpaced run of `duration` simulated seconds.
    pub fn analysis(duration: f64) -> Self {
        Self {
            run_mode: RunMode::Analysis { duration },
            pace_real_time: false,
            ..Self::default()
        }
    }

    pub fn with_physics(mut self, physics: PhysicsConfig) -> Self {
        self.physics = physics;
        self
    }

    pub fn join_timeout(&self) -> Duration {
        Duration::from_millis(self.join_timeout_ms)
    }

    /// Number of steps an analysis run takes, `None` for real-time runs.
    pub fn step_limit(&self) -> Option<u64> {
        match self.run_mode {
            RunMode::RealTime => None,
            RunMode::Analysis { duration } => {
                Some((duration / self.physics.dt).round().max(0.0) as u64)
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physics.validate()?;
        if let RunMode::Analysis { duration } = self.run_mode {
            if !duration.is_finite() || duration <= 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "analysis duration must be positive, got {}",
                    duration
                )));
            }
        }
        if self.subscriber_buffer == 0 {
            return Err(ConfigError::ValidationError(
                "subscriber buffer must hold at least one entry".to_string(),
            ));
        }
        if self.max_log_entries == Some(0) {
            return Err(ConfigError::ValidationError(
                "max_log_entries must be positive when set".to_string(),
            ));
        }
        if !self.initial_latitude.is_finite() || !self.initial_longitude.is_finite() {
            return Err(ConfigError::ValidationError(
                "initial latitude/longitude must be finite".to_string(),
            ));
        }
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_yaml::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        serde_yaml::to_writer(file, self)?;
        Ok(())
    }
}
