pub mod config;
pub mod environment;

pub use config::{PhysicsConfig, RunMode, SimulationConfig};
pub use environment::{AtmosphereSample, EnvironmentSample, EnvironmentSnapshot, StandardAtmosphere};
