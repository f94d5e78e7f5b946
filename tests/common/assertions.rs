use std::f64::consts::PI;
use std::sync::Arc;

use sixdof::{components::RigidBodyState, simulation::LogEntry};

/// Assert that every component of a rigid-body state is finite
#[track_caller]
pub fn assert_state_valid(state: &RigidBodyState) {
    assert!(
        state.velocity.iter().all(|v| v.is_finite()),
        "Velocity is not finite: {:?}",
        state.velocity
    );
    assert!(
        state.angular_rate.iter().all(|v| v.is_finite()),
        "Angular rate is not finite: {:?}",
        state.angular_rate
    );
    assert!(
        state.attitude.iter().all(|v| v.is_finite()),
        "Attitude is not finite: {:?}",
        state.attitude
    );
    assert!(
        state.position.iter().all(|v| v.is_finite()),
        "Position is not finite: {:?}",
        state.position
    );
}

/// Assert that the Euler angles are in their wrapped ranges
#[track_caller]
pub fn assert_angles_canonical(state: &RigidBodyState) {
    let (phi, theta, psi) = (state.phi(), state.theta(), state.psi());
    assert!(phi > -PI && phi <= PI, "phi {} outside (-pi, pi]", phi);
    assert!(
        (-PI / 2.0..=PI / 2.0).contains(&theta),
        "theta {} outside [-pi/2, pi/2]",
        theta
    );
    assert!((0.0..2.0 * PI).contains(&psi), "psi {} outside [0, 2pi)", psi);
}

/// Assert that log entries are numbered consecutively without gaps or repeats
#[track_caller]
pub fn assert_contiguous_steps(entries: &[Arc<LogEntry>]) {
    for pair in entries.windows(2) {
        assert_eq!(
            pair[1].step,
            pair[0].step + 1,
            "Step {} followed by {}",
            pair[0].step,
            pair[1].step
        );
    }
}
