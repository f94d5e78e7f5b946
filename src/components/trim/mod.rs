mod config;
mod solver;
mod state;

pub use config::{LateralBounds, LongitudinalBounds, TrimSolverConfig};
pub use solver::{TrimError, TrimOptimizer, TrimSolver};
pub use state::{
    LateralTrimState, LongitudinalTrimState, TrimCondition, TrimMode, TrimResult, TrimState,
};
