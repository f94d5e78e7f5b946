use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::utils::GRAVITY;

/// Weight breakdown and inertia of the airframe.
///
/// Weights are in lbf and inertias in slug·ft². Fuel and payload are added to
/// the empty weight to give the flying weight; inertias are taken as given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassProperties {
    pub weight_empty: f64,
    pub weight_fuel: f64,
    pub weight_payload: f64,
    pub ix: f64,
    pub iy: f64,
    pub iz: f64,
    pub ixz: f64,
}

impl MassProperties {
    pub fn new(weight: f64, ix: f64, iy: f64, iz: f64, ixz: f64) -> Self {
        Self {
            weight_empty: weight,
            weight_fuel: 0.0,
            weight_payload: 0.0,
            ix,
            iy,
            iz,
            ixz,
        }
    }

    pub fn navion() -> Self {
        Self::new(2750.0, 1048.0, 3000.0, 3050.0, 0.0)
    }

    /// Flying weight (lbf).
    pub fn weight(&self) -> f64 {
        self.weight_empty + self.weight_fuel + self.weight_payload
    }

    /// Mass (slug).
    pub fn mass(&self) -> f64 {
        self.weight() / GRAVITY
    }

    pub fn inertia(&self) -> Matrix3<f64> {
        Matrix3::from_columns(&[
            Vector3::new(self.ix, 0.0, -self.ixz),
            Vector3::new(0.0, self.iy, 0.0),
            Vector3::new(-self.ixz, 0.0, self.iz),
        ])
    }

    /// Ix·Iz − Ixz², the determinant of the x-z block of the inertia tensor.
    pub fn gamma(&self) -> f64 {
        self.ix * self.iz - self.ixz * self.ixz
    }

    pub fn inertia_coefficients(&self) -> InertiaCoefficients {
        InertiaCoefficients::new(self)
    }
}

/// The c1..c9 constants of the body-axis rotational equations (Stevens & Lewis).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InertiaCoefficients {
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
    pub c4: f64,
    pub c5: f64,
    pub c6: f64,
    pub c7: f64,
    pub c8: f64,
    pub c9: f64,
}

impl InertiaCoefficients {
    pub fn new(mass: &MassProperties) -> Self {
        let (ix, iy, iz, ixz) = (mass.ix, mass.iy, mass.iz, mass.ixz);
        let gamma = mass.gamma();

        Self {
            c1: ((iy - iz) * iz - ixz * ixz) / gamma,
            c2: ((ix - iy + iz) * ixz) / gamma,
            c3: iz / gamma,
            c4: ixz / gamma,
            c5: (iz - ix) / iy,
            c6: ixz / iy,
            c7: 1.0 / iy,
            c8: ((ix - iy) * ix + ixz * ixz) / gamma,
            c9: ix / gamma,
        }
    }
}
