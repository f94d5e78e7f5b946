use serde::{Deserialize, Serialize};

use crate::components::ControlId;
use crate::utils::deg_to_rad;

/// Configuration for the trim solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimSolverConfig {
    /// Iteration budget for the direct search
    pub max_iterations: u64,
    /// Converged once the summed squared body accelerations fall below this
    pub cost_tolerance: f64,
    /// Standard deviation of the simplex costs at which the search stops
    pub simplex_tolerance: f64,
    /// Whether to polish the direct search result with Newton steps
    pub use_newton_refinement: bool,
    pub newton_iterations: usize,
    /// Perturbation used for the finite-difference Jacobian
    pub finite_difference_step: f64,
    /// Weights on [u̇, v̇, ẇ, ṗ, q̇, ṙ] in the direct search cost
    pub residual_weights: [f64; 6],
    /// Bounds for longitudinal controls and states
    pub longitudinal_bounds: LongitudinalBounds,
    /// Bounds for lateral controls and states
    pub lateral_bounds: LateralBounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LongitudinalBounds {
    pub elevator_range: (f64, f64),
    pub throttle_range: (f64, f64),
    pub alpha_range: (f64, f64),
}

impl Default for LongitudinalBounds {
    fn default() -> Self {
        Self {
            elevator_range: ControlId::Elevator.limits(),
            throttle_range: ControlId::Throttle.limits(),
            alpha_range: (deg_to_rad(-15.0), deg_to_rad(20.0)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LateralBounds {
    pub aileron_range: (f64, f64),
    pub rudder_range: (f64, f64),
    pub phi_range: (f64, f64),
}

impl Default for LateralBounds {
    fn default() -> Self {
        Self {
            aileron_range: ControlId::Aileron.limits(),
            rudder_range: ControlId::Rudder.limits(),
            phi_range: (deg_to_rad(-80.0), deg_to_rad(80.0)),
        }
    }
}

impl Default for TrimSolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            cost_tolerance: 1e-8,
            simplex_tolerance: 1e-12,
            use_newton_refinement: true,
            newton_iterations: 50,
            finite_difference_step: 1e-6,
            residual_weights: [1.0, 1.0, 1.0, 4.0, 4.0, 4.0],
            longitudinal_bounds: LongitudinalBounds::default(),
            lateral_bounds: LateralBounds::default(),
        }
    }
}

impl TrimSolverConfig {
    pub fn without_refinement(mut self) -> Self {
        self.use_newton_refinement = false;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.cost_tolerance.is_finite() && self.cost_tolerance > 0.0) {
            return Err(format!("cost_tolerance must be positive, got {}", self.cost_tolerance));
        }
        if !(self.finite_difference_step.is_finite() && self.finite_difference_step > 0.0) {
            return Err(format!(
                "finite_difference_step must be positive, got {}",
                self.finite_difference_step
            ));
        }
        if self.residual_weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err("residual weights must be finite and non-negative".to_string());
        }

        let ranges = [
            ("elevator_range", self.longitudinal_bounds.elevator_range),
            ("throttle_range", self.longitudinal_bounds.throttle_range),
            ("alpha_range", self.longitudinal_bounds.alpha_range),
            ("aileron_range", self.lateral_bounds.aileron_range),
            ("rudder_range", self.lateral_bounds.rudder_range),
            ("phi_range", self.lateral_bounds.phi_range),
        ];
        for (name, (lower, upper)) in ranges {
            if !(lower.is_finite() && upper.is_finite() && lower < upper) {
                return Err(format!("{} must be an increasing finite pair", name));
            }
        }
        Ok(())
    }
}
