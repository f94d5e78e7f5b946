use std::thread;
use std::time::{Duration, Instant};

use sixdof::{
    components::{AircraftHandle, TrimCondition, TrimResult},
    trim,
};

/// Trims `aircraft` and fails the test if it does not converge.
#[track_caller]
pub fn trimmed(aircraft: &AircraftHandle, condition: &TrimCondition) -> TrimResult {
    let result = trim(aircraft, condition).expect("trim inputs are valid");
    assert!(
        result.converged,
        "trim did not converge, residual {:e}",
        result.residual_norm()
    );
    result
}

/// Polls `condition` until it holds or `timeout` passes. Returns whether it held.
pub fn wait_for_condition<F: FnMut() -> bool>(timeout: Duration, mut condition: F) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    condition()
}
