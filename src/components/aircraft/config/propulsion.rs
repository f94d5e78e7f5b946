use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Engine family and its family-specific parameters.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineKind {
    FixedPitchProp(FixedPitchPropSpec),
}

/// Piston engine driving a fixed-pitch propeller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedPitchPropSpec {
    /// Brake horsepower at standard sea level.
    pub max_bhp: f64,
    pub max_rpm: f64,
    /// Propeller diameter (ft).
    pub prop_diameter: f64,
    pub prop_efficiency: f64,
    /// First-order RPM response time constant (s).
    pub rpm_time_constant: f64,
}

impl Default for FixedPitchPropSpec {
    fn default() -> Self {
        Self {
            max_bhp: 200.0,
            max_rpm: 2700.0,
            prop_diameter: 6.5,
            prop_efficiency: 0.85,
            rpm_time_constant: 0.5,
        }
    }
}

impl FixedPitchPropSpec {
    /// Propeller disc area (ft²).
    pub fn prop_area(&self) -> f64 {
        std::f64::consts::PI * self.prop_diameter * self.prop_diameter / 4.0
    }
}

/// Configuration for one engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSpec {
    pub name: String,
    /// 1-based index of the engine on the airframe.
    pub number: usize,
    /// Thrust application point relative to the CG, body axes (ft).
    pub position: Vector3<f64>,
    /// Written as a one-key map, `kind: {FixedPitchProp: {...}}`.
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub kind: EngineKind,
}

impl EngineSpec {
    pub fn fixed_pitch(name: impl Into<String>, number: usize, spec: FixedPitchPropSpec) -> Self {
        Self {
            name: name.into(),
            number,
            position: Vector3::zeros(),
            kind: EngineKind::FixedPitchProp(spec),
        }
    }

    pub fn at(mut self, position: Vector3<f64>) -> Self {
        self.position = position;
        self
    }

    /// Navion's Continental IO-470 turning a fixed-pitch propeller, on the CG.
    pub fn navion() -> Self {
        Self::fixed_pitch("IO-470", 1, FixedPitchPropSpec::default())
    }

    /// Parameter sanity; returns a description of the first problem found.
    pub fn check(&self) -> Result<(), String> {
        if !self.position.iter().all(|c| c.is_finite()) {
            return Err(format!("engine {} position is not finite", self.number));
        }
        match &self.kind {
            EngineKind::FixedPitchProp(prop) => {
                let positive = [
                    ("max_bhp", prop.max_bhp),
                    ("max_rpm", prop.max_rpm),
                    ("prop_diameter", prop.prop_diameter),
                    ("rpm_time_constant", prop.rpm_time_constant),
                ];
                for (name, value) in positive {
                    if !value.is_finite() || value <= 0.0 {
                        return Err(format!(
                            "engine {} {} must be positive, got {}",
                            self.number, name, value
                        ));
                    }
                }
                if !(prop.prop_efficiency > 0.0 && prop.prop_efficiency <= 1.0) {
                    return Err(format!(
                        "engine {} prop_efficiency must be in (0, 1], got {}",
                        self.number, prop.prop_efficiency
                    ));
                }
                Ok(())
            }
        }
    }
}
