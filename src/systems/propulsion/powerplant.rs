use nalgebra::Vector3;
use std::fmt::Debug;

use crate::components::{
    ControlInputSnapshot, EngineKind, EngineSpec, EngineState, ForceMoment, PropulsionState,
};
use crate::resources::AtmosphereSample;

use super::fixed_pitch::FixedPitchPropEngine;

/// Capability every engine family provides to the simulation.
///
/// `update_state` advances the engine dynamics by one step; `settle` jumps
/// straight to the steady state for the current inputs, which is what trim
/// and loop start-up need.
pub trait Powerplant: Debug + Send + Sync {
    fn spec(&self) -> &EngineSpec;

    fn update_state(
        &mut self,
        controls: &ControlInputSnapshot,
        atmosphere: &AtmosphereSample,
        airspeed: f64,
        dt: f64,
    );

    fn settle(&mut self, controls: &ControlInputSnapshot, atmosphere: &AtmosphereSample, airspeed: f64);

    fn state(&self) -> EngineState;

    fn boxed_clone(&self) -> Box<dyn Powerplant>;

    fn thrust(&self) -> Vector3<f64> {
        self.state().thrust
    }

    fn moment(&self) -> Vector3<f64> {
        self.state().moment
    }
}

impl Clone for Box<dyn Powerplant> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

/// Picks the engine model for `spec`.
pub fn build_powerplant(spec: &EngineSpec) -> Box<dyn Powerplant> {
    match &spec.kind {
        EngineKind::FixedPitchProp(prop) => Box::new(FixedPitchPropEngine::new(spec.clone(), *prop)),
    }
}

/// All engines of one aircraft; engines contribute independently and their
/// forces and moments add.
#[derive(Debug, Clone, Default)]
pub struct Propulsion {
    engines: Vec<Box<dyn Powerplant>>,
}

impl Propulsion {
    pub fn new(specs: &[EngineSpec]) -> Self {
        Self {
            engines: specs.iter().map(build_powerplant).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    pub fn update_state(
        &mut self,
        controls: &ControlInputSnapshot,
        atmosphere: &AtmosphereSample,
        airspeed: f64,
        dt: f64,
    ) {
        for engine in &mut self.engines {
            engine.update_state(controls, atmosphere, airspeed, dt);
        }
    }

    pub fn settle(&mut self, controls: &ControlInputSnapshot, atmosphere: &AtmosphereSample, airspeed: f64) {
        for engine in &mut self.engines {
            engine.settle(controls, atmosphere, airspeed);
        }
    }

    /// Summed thrust and moment about the CG.
    pub fn total(&self) -> ForceMoment {
        self.engines
            .iter()
            .map(|engine| ForceMoment::new(engine.thrust(), engine.moment()))
            .sum()
    }

    pub fn state(&self) -> PropulsionState {
        PropulsionState {
            engines: self.engines.iter().map(|engine| engine.state()).collect(),
        }
    }
}
