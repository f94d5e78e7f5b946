mod atmosphere;
mod environment;

pub use atmosphere::{AtmosphereSample, StandardAtmosphere};
pub use environment::{EnvironmentSample, EnvironmentSnapshot};
