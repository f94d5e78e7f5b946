use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Wing reference dimensions and the reference points the force models need.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AircraftGeometry {
    /// Reference wing area (ft²).
    pub wing_area: f64,
    /// Wing span (ft).
    pub wing_span: f64,
    /// Mean aerodynamic chord (ft).
    pub mean_chord: f64,
    /// Center of gravity in body axes (ft).
    pub center_of_gravity: Vector3<f64>,
    /// Aerodynamic center in body axes (ft).
    pub aerodynamic_center: Vector3<f64>,
}

impl AircraftGeometry {
    /// Creates a new `AircraftGeometry` with the CG and aerodynamic center at
    /// the body origin.
    ///
    /// # Arguments
    /// * `wing_area` - Reference wing area (ft²).
    /// * `wing_span` - Wing span (ft).
    /// * `mean_chord` - Mean aerodynamic chord (ft).
    pub fn new(wing_area: f64, wing_span: f64, mean_chord: f64) -> Self {
        AircraftGeometry {
            wing_area,
            wing_span,
            mean_chord,
            center_of_gravity: Vector3::zeros(),
            aerodynamic_center: Vector3::zeros(),
        }
    }

    pub fn navion() -> Self {
        Self::new(184.0, 33.4, 5.7)
    }

    pub fn with_reference_points(
        mut self,
        center_of_gravity: Vector3<f64>,
        aerodynamic_center: Vector3<f64>,
    ) -> Self {
        self.center_of_gravity = center_of_gravity;
        self.aerodynamic_center = aerodynamic_center;
        self
    }

    /// Arm from the CG to the aerodynamic center.
    pub fn aero_arm(&self) -> Vector3<f64> {
        self.aerodynamic_center - self.center_of_gravity
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.wing_span * self.wing_span / self.wing_area
    }
}
