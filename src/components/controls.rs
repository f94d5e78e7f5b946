use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier of one pilot control.
///
/// Surface deflections are in radians with the usual sign conventions:
/// elevator and flaps positive trailing edge down, aileron positive with the
/// right trailing edge down, rudder positive trailing edge left. Levers are
/// fractions in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ControlId {
    Elevator,
    Aileron,
    Rudder,
    Flaps,
    Gear,
    Throttle,
    /// Propeller pitch lever. Carried for variable-pitch powerplants; the
    /// fixed-pitch engine ignores it.
    Propeller,
    Mixture,
}

impl ControlId {
    pub const ALL: [ControlId; 8] = [
        ControlId::Elevator,
        ControlId::Aileron,
        ControlId::Rudder,
        ControlId::Flaps,
        ControlId::Gear,
        ControlId::Throttle,
        ControlId::Propeller,
        ControlId::Mixture,
    ];

    /// Allowed range `(min, max)`.
    pub fn limits(&self) -> (f64, f64) {
        match self {
            ControlId::Elevator => (-0.4363, 0.4363),
            ControlId::Aileron => (-0.3491, 0.3491),
            ControlId::Rudder => (-0.4363, 0.4363),
            ControlId::Flaps => (0.0, 0.5236),
            ControlId::Gear
            | ControlId::Throttle
            | ControlId::Propeller
            | ControlId::Mixture => (0.0, 1.0),
        }
    }

    /// Value before anything is written: surfaces neutral, gear and throttle
    /// at zero, propeller and mixture full forward.
    pub fn neutral(&self) -> f64 {
        match self {
            ControlId::Propeller | ControlId::Mixture => 1.0,
            _ => 0.0,
        }
    }

    /// `value` limited to this control's range; NaN reads as neutral.
    pub fn clamp_value(&self, value: f64) -> f64 {
        let (min, max) = self.limits();
        if value.is_nan() {
            self.neutral()
        } else {
            value.clamp(min, max)
        }
    }
}

/// Complete set of control positions at one instant.
///
/// Every [`ControlId`] always has a value; writes are clamped to its limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlInputSnapshot {
    values: BTreeMap<ControlId, f64>,
}

impl Default for ControlInputSnapshot {
    fn default() -> Self {
        Self {
            values: ControlId::ALL.iter().map(|id| (*id, id.neutral())).collect(),
        }
    }
}

impl ControlInputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ControlId) -> f64 {
        self.values.get(&id).copied().unwrap_or_else(|| id.neutral())
    }

    /// Writes `value`, clamped; returns the value actually stored.
    pub fn set(&mut self, id: ControlId, value: f64) -> f64 {
        let clamped = id.clamp_value(value);
        self.values.insert(id, clamped);
        clamped
    }

    pub fn with(mut self, id: ControlId, value: f64) -> Self {
        self.set(id, value);
        self
    }

    pub fn elevator(&self) -> f64 {
        self.get(ControlId::Elevator)
    }

    pub fn aileron(&self) -> f64 {
        self.get(ControlId::Aileron)
    }

    pub fn rudder(&self) -> f64 {
        self.get(ControlId::Rudder)
    }

    pub fn flaps(&self) -> f64 {
        self.get(ControlId::Flaps)
    }

    pub fn gear(&self) -> f64 {
        self.get(ControlId::Gear)
    }

    pub fn throttle(&self) -> f64 {
        self.get(ControlId::Throttle)
    }

    /// Not read by fixed-pitch engines.
    pub fn propeller(&self) -> f64 {
        self.get(ControlId::Propeller)
    }

    pub fn mixture(&self) -> f64 {
        self.get(ControlId::Mixture)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ControlId, f64)> + '_ {
        self.values.iter().map(|(id, value)| (*id, *value))
    }
}
