use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// A force and the moment it produces about the CG, body axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceMoment {
    /// lbf
    pub force: Vector3<f64>,
    /// lbf·ft
    pub moment: Vector3<f64>,
}

impl Default for ForceMoment {
    fn default() -> Self {
        Self::zero()
    }
}

impl ForceMoment {
    pub fn new(force: Vector3<f64>, moment: Vector3<f64>) -> Self {
        Self { force, moment }
    }

    pub fn zero() -> Self {
        Self::new(Vector3::zeros(), Vector3::zeros())
    }

    /// A force applied at `arm` from the CG.
    pub fn applied_at(force: Vector3<f64>, arm: Vector3<f64>) -> Self {
        Self::new(force, arm.cross(&force))
    }

    pub fn is_finite(&self) -> bool {
        self.force.iter().chain(self.moment.iter()).all(|v| v.is_finite())
    }
}

impl Add for ForceMoment {
    type Output = ForceMoment;

    fn add(self, rhs: ForceMoment) -> ForceMoment {
        ForceMoment::new(self.force + rhs.force, self.moment + rhs.moment)
    }
}

impl AddAssign for ForceMoment {
    fn add_assign(&mut self, rhs: ForceMoment) {
        self.force += rhs.force;
        self.moment += rhs.moment;
    }
}

impl std::iter::Sum for ForceMoment {
    fn sum<I: Iterator<Item = ForceMoment>>(iter: I) -> ForceMoment {
        iter.fold(ForceMoment::zero(), |acc, fm| acc + fm)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForceCategory {
    Aerodynamic,
    Propulsive,
    Gravitational,
}

/// Loads acting on the airframe, kept per source so they can be logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ForceBreakdown {
    pub aerodynamic: ForceMoment,
    pub propulsive: ForceMoment,
    pub gravitational: ForceMoment,
}

impl ForceBreakdown {
    pub fn get(&self, category: ForceCategory) -> ForceMoment {
        match category {
            ForceCategory::Aerodynamic => self.aerodynamic,
            ForceCategory::Propulsive => self.propulsive,
            ForceCategory::Gravitational => self.gravitational,
        }
    }

    pub fn total(&self) -> ForceMoment {
        self.aerodynamic + self.propulsive + self.gravitational
    }
}
