mod aircraft;
mod conditions;

// Re-export test fixtures
pub use aircraft::*;
pub use conditions::*;
