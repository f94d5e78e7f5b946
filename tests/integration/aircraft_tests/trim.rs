use approx::assert_relative_eq;
use sixdof::{
    components::{TrimCondition, TrimError, TrimMode, TrimSolver, TrimSolverConfig},
    resources::StandardAtmosphere,
    trim,
    utils::{knots_to_fps, GRAVITY},
};

use crate::common::{create_navion, navion_cruise, navion_rate_one_turn, trimmed};

#[test]
fn test_navion_cruise_trim() {
    let aircraft = create_navion();
    let condition = navion_cruise();
    let result = trimmed(&aircraft, &condition);

    assert!(result.residual_norm() < 1e-3);
    assert!(result.cost < TrimSolverConfig::default().cost_tolerance);

    let long = result.trim_state.longitudinal;
    assert_relative_eq!(long.alpha, -0.0455, epsilon = 1e-2);
    // Alpha is slightly negative at this speed, so CM_alpha pitches the nose
    // up and the elevator trims trailing edge down.
    assert!(long.elevator > 0.0 && long.elevator < 0.1, "elevator {}", long.elevator);
    assert!(long.throttle > 0.25 && long.throttle < 0.55, "throttle {}", long.throttle);

    // Wings level, pitch equals alpha, holding altitude and heading.
    assert_relative_eq!(result.state.theta(), long.alpha, epsilon = 1e-9);
    assert_eq!(result.state.phi(), 0.0);
    assert_relative_eq!(result.state.altitude(), 5_000.0);
    assert_relative_eq!(result.state.ned_velocity().z, 0.0, epsilon = 1e-9);

    let density = StandardAtmosphere::sample(5_000.0).density;
    let q_bar = 0.5 * density * condition.airspeed.powi(2);
    assert_relative_eq!(q_bar, 65.6, epsilon = 0.5);
}

#[test]
fn test_climb_needs_more_power() {
    let aircraft = create_navion();
    let level = trimmed(&aircraft, &navion_cruise());
    let climb = trimmed(&aircraft, &navion_cruise().with_climb_angle(2.0_f64.to_radians()));

    assert!(climb.controls.throttle() > level.controls.throttle());
    assert!(climb.state.ned_velocity().z < 0.0, "should be climbing");
    assert_relative_eq!(
        climb.state.theta() - climb.trim_state.longitudinal.alpha,
        2.0_f64.to_radians(),
        epsilon = 1e-9
    );
}

#[test]
fn test_coordinated_turn_trim() {
    let aircraft = create_navion();
    let condition = navion_rate_one_turn();
    assert_eq!(condition.mode(), TrimMode::Combined);

    let result = trimmed(&aircraft, &condition);
    let expected_bank = (condition.airspeed * condition.turn_rate / GRAVITY).atan();
    assert_relative_eq!(result.state.phi(), expected_bank, epsilon = 0.05);
    assert!(result.residual_norm() < 1e-3);
    assert!(result.state.angular_rate.z > 0.0);

    let level = trimmed(&aircraft, &navion_cruise());
    assert!(result.controls.throttle() > level.controls.throttle());
}

#[test]
fn test_out_of_envelope_reports_non_convergence() {
    let aircraft = create_navion();
    let condition = TrimCondition::straight_and_level(knots_to_fps(30.0), 5_000.0);
    let result = trim(&aircraft, &condition).unwrap();

    assert!(!result.converged);
    assert!(result.residual_norm() > 1e-3);
    assert!(result.residuals.iter().all(|r| r.is_finite()));
}

#[test]
fn test_invalid_condition() {
    let aircraft = create_navion();
    let err = trim(&aircraft, &TrimCondition::straight_and_level(-5.0, 1_000.0)).unwrap_err();
    assert!(matches!(err, TrimError::InvalidCondition(_)));

    let err = trim(&aircraft, &TrimCondition::straight_and_level(200.0, f64::INFINITY)).unwrap_err();
    assert!(matches!(err, TrimError::InvalidCondition(_)));
}

#[test]
fn test_direct_search_alone_gets_close() {
    let aircraft = create_navion();
    let result = TrimSolver::new(&aircraft, navion_cruise())
        .with_settings(TrimSolverConfig::default().without_refinement())
        .solve()
        .unwrap();
    assert!(result.residual_norm() < 0.1, "residual {}", result.residual_norm());
}
