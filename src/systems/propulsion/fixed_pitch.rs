use nalgebra::Vector3;

use crate::components::{ControlInputSnapshot, EngineSpec, EngineState, FixedPitchPropSpec};
use crate::resources::AtmosphereSample;
use crate::utils::{HP_TO_FTLBS, ISA_SEA_LEVEL_DENSITY};

use super::powerplant::Powerplant;

/// Gagg–Ferrar altitude power correction, P/P_SL = A_P·σ − B_P.
const A_P: f64 = 1.132;
const B_P: f64 = 0.132;

/// Brake specific fuel consumption (lb/(hp·hr)).
const BSFC: f64 = 0.45;
/// Avgas weight (lb/gal).
const FUEL_DENSITY: f64 = 6.0;

/// Piston engine with a fixed-pitch propeller.
#[derive(Debug, Clone)]
pub struct FixedPitchPropEngine {
    spec: EngineSpec,
    prop: FixedPitchPropSpec,
    state: EngineState,
}

impl FixedPitchPropEngine {
    pub fn new(spec: EngineSpec, prop: FixedPitchPropSpec) -> Self {
        Self {
            spec,
            prop,
            state: EngineState::default(),
        }
    }

    /// RPM the throttle is asking for, never beyond max RPM.
    pub fn target_rpm(&self, controls: &ControlInputSnapshot) -> f64 {
        (controls.throttle() * self.prop.max_rpm).clamp(0.0, self.prop.max_rpm)
    }

    /// Thrust, power and fuel flow at the current RPM.
    fn refresh_outputs(
        &mut self,
        controls: &ControlInputSnapshot,
        atmosphere: &AtmosphereSample,
        airspeed: f64,
    ) {
        let rpm = self.state.rpm.clamp(0.0, self.prop.max_rpm);
        let density = atmosphere.density.max(0.0);
        let sigma = density / ISA_SEA_LEVEL_DENSITY;

        let altitude_factor = (A_P * sigma - B_P).max(0.0);
        let bhp = (self.prop.max_bhp * (rpm / self.prop.max_rpm) * altitude_factor
            * controls.mixture())
        .max(0.0);
        let shaft_power = bhp * HP_TO_FTLBS;

        let revs_per_second = rpm / 60.0;
        let advance_ratio = if revs_per_second > 0.0 {
            airspeed.max(0.0) / (revs_per_second * self.prop.prop_diameter)
        } else {
            0.0
        };

        // Momentum theory caps the η·P/V curve, keeping thrust finite as V → 0.
        let static_thrust =
            (shaft_power * shaft_power * 2.0 * density * self.prop.prop_area()).cbrt();
        let thrust = if airspeed > 1.0 {
            (self.prop.prop_efficiency * shaft_power / airspeed).min(static_thrust)
        } else {
            static_thrust
        };

        let thrust_vector = Vector3::new(thrust, 0.0, 0.0);
        self.state = EngineState {
            rpm,
            fuel_flow: bhp * BSFC / FUEL_DENSITY,
            bhp,
            advance_ratio,
            thrust: thrust_vector,
            moment: self.spec.position.cross(&thrust_vector),
        };
    }
}

impl Powerplant for FixedPitchPropEngine {
    fn spec(&self) -> &EngineSpec {
        &self.spec
    }

    fn update_state(
        &mut self,
        controls: &ControlInputSnapshot,
        atmosphere: &AtmosphereSample,
        airspeed: f64,
        dt: f64,
    ) {
        let target = self.target_rpm(controls);
        let decay = (-dt / self.prop.rpm_time_constant).exp();
        self.state.rpm = target + (self.state.rpm - target) * decay;
        self.refresh_outputs(controls, atmosphere, airspeed);
    }

    fn settle(&mut self, controls: &ControlInputSnapshot, atmosphere: &AtmosphereSample, airspeed: f64) {
        self.state.rpm = self.target_rpm(controls);
        self.refresh_outputs(controls, atmosphere, airspeed);
    }

    fn state(&self) -> EngineState {
        self.state
    }

    fn boxed_clone(&self) -> Box<dyn Powerplant> {
        Box::new(self.clone())
    }
}
