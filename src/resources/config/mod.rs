pub mod physics;
pub mod simulation;

pub use physics::PhysicsConfig;
pub use simulation::{RunMode, SimulationConfig};
