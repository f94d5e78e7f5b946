use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;

use crate::components::{ControlInputSnapshot, PropulsionState, RigidBodyState};
use crate::resources::EnvironmentSnapshot;
use crate::systems::Evaluation;
use crate::utils::{rad_to_deg, EARTH_RADIUS};

/// Quantities derived from the state after a step, for display and export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedOutputs {
    pub alpha: f64,
    pub beta: f64,
    pub true_airspeed: f64,
    pub mach: f64,
    pub dynamic_pressure: f64,
    pub altitude: f64,
    /// Positive climbing (ft/s).
    pub vertical_speed: f64,
    pub flight_path_angle: f64,
    /// Aerodynamic and propulsive force along -z over weight.
    pub load_factor: f64,
    /// Spherical-earth position estimate (deg). Not geodesy.
    pub latitude: f64,
    pub longitude: f64,
    pub propulsion: PropulsionState,
    /// Body accelerations [u̇, v̇, ẇ, ṗ, q̇, ṙ].
    pub accelerations: [f64; 6],
}

impl DerivedOutputs {
    pub fn new(
        state: &RigidBodyState,
        evaluation: &Evaluation,
        propulsion: PropulsionState,
        reference: (f64, f64),
    ) -> Self {
        let air = &evaluation.air_data;
        let ned_velocity = state.ned_velocity();
        let vertical_speed = -ned_velocity.z;
        let ground_speed = ned_velocity.norm();
        let flight_path_angle = if ground_speed > 1e-6 {
            (vertical_speed / ground_speed).clamp(-1.0, 1.0).asin()
        } else {
            0.0
        };

        let weight = evaluation.loads.gravitational.force.norm();
        let lifting = evaluation.loads.aerodynamic.force + evaluation.loads.propulsive.force;
        let load_factor = if weight > 0.0 { -lifting.z / weight } else { 0.0 };

        let (latitude, longitude) = position_estimate(reference, state.position.x, state.position.y);

        Self {
            alpha: air.alpha,
            beta: air.beta,
            true_airspeed: air.true_airspeed,
            mach: air.mach,
            dynamic_pressure: air.dynamic_pressure,
            altitude: state.altitude(),
            vertical_speed,
            flight_path_angle,
            load_factor,
            latitude,
            longitude,
            propulsion,
            accelerations: evaluation.accelerations(),
        }
    }
}

/// Latitude/longitude (deg) of a point `north`/`east` ft from `reference`.
pub fn position_estimate(reference: (f64, f64), north: f64, east: f64) -> (f64, f64) {
    let (lat0, lon0) = reference;
    let latitude = lat0 + rad_to_deg(north / EARTH_RADIUS);
    let cos_lat = lat0.to_radians().cos().max(1e-6);
    let longitude = lon0 + rad_to_deg(east / (EARTH_RADIUS * cos_lat));
    (latitude, longitude)
}

/// One completed step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Zero-based, contiguous, never reused.
    pub step: u64,
    /// Simulated time at the end of the step (s).
    pub time: f64,
    pub state: RigidBodyState,
    pub controls: ControlInputSnapshot,
    pub environment: EnvironmentSnapshot,
    pub derived: DerivedOutputs,
}

impl LogEntry {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Append-only record of a run, optionally capped to the newest entries.
#[derive(Debug, Clone, Default)]
pub struct StateLog {
    entries: VecDeque<Arc<LogEntry>>,
    max_entries: Option<usize>,
    evicted: u64,
}

impl StateLog {
    /// A cap of zero is treated as one.
    pub fn new(max_entries: Option<usize>) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries: max_entries.map(|max| max.max(1)),
            evicted: 0,
        }
    }

    pub fn push(&mut self, entry: Arc<LogEntry>) {
        if let Some(max) = self.max_entries {
            while self.entries.len() >= max {
                self.entries.pop_front();
                self.evicted += 1;
            }
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries dropped because of the length cap.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    pub fn last(&self) -> Option<Arc<LogEntry>> {
        self.entries.back().cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<LogEntry>> + '_ {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<Arc<LogEntry>> {
        self.entries.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The whole log as a JSON array.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let entries: Vec<&LogEntry> = self.entries.iter().map(|e| e.as_ref()).collect();
        serde_json::to_string(&entries)
    }
}
