#![allow(dead_code)]

mod assertions;
mod fixtures;
mod helpers;

// Re-export
pub use assertions::{assert_angles_canonical, assert_contiguous_steps, assert_state_valid};

pub use fixtures::*;
pub use helpers::*;
