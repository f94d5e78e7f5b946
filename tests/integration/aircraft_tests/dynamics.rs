use approx::assert_relative_eq;
use nalgebra::Vector3;
use sixdof::{
    components::{ControlId, ControlInputSnapshot, RigidBodyState},
    resources::{EnvironmentSnapshot, SimulationConfig},
    simulation::Stepper,
    utils::GRAVITY,
};

use crate::common::{
    assert_angles_canonical, assert_state_valid, create_ballistic_aircraft, create_navion,
    navion_cruise, trimmed,
};

#[test]
fn test_trimmed_flight_stays_steady() {
    let aircraft = create_navion();
    let trim = trimmed(&aircraft, &navion_cruise());
    let env = EnvironmentSnapshot::calm();
    let mut stepper = Stepper::new(
        aircraft,
        trim.state,
        &trim.controls,
        &env,
        &SimulationConfig::default(),
    )
    .unwrap();

    let mut last = None;
    for _ in 0..500 {
        let entry = stepper.step(&trim.controls, &env).unwrap();
        assert_state_valid(&entry.state);
        last = Some(entry);
    }
    let last = last.unwrap();

    let accel_norm = last
        .derived
        .accelerations
        .iter()
        .map(|a| a * a)
        .sum::<f64>()
        .sqrt();
    assert!(accel_norm < 1e-3, "acceleration norm {}", accel_norm);
    assert_relative_eq!(last.derived.altitude, 5_000.0, epsilon = 1.0);
    assert_relative_eq!(last.derived.true_airspeed, navion_cruise().airspeed, epsilon = 0.1);
    assert_relative_eq!(last.derived.load_factor, last.state.theta().cos(), epsilon = 1e-3);
    assert_relative_eq!(last.time, 5.0, epsilon = 1e-9);
}

#[test]
fn test_free_fall_matches_analytic() {
    let aircraft = create_ballistic_aircraft();
    let initial = RigidBodyState {
        velocity: Vector3::new(100.0, 0.0, 0.0),
        position: Vector3::new(0.0, 0.0, -10_000.0),
        ..RigidBodyState::default()
    };
    let controls = ControlInputSnapshot::default();
    let env = EnvironmentSnapshot::calm();
    let mut stepper =
        Stepper::new(aircraft, initial, &controls, &env, &SimulationConfig::default()).unwrap();

    for _ in 0..200 {
        stepper.step(&controls, &env).unwrap();
    }
    let t = stepper.time();
    let state = stepper.state();

    assert_relative_eq!(t, 2.0, epsilon = 1e-9);
    assert_relative_eq!(state.velocity.x, 100.0, epsilon = 1e-9);
    assert_relative_eq!(state.velocity.z, GRAVITY * t, epsilon = 1e-6);
    assert_relative_eq!(state.position.x, 100.0 * t, epsilon = 1e-6);
    assert_relative_eq!(state.altitude(), 10_000.0 - 0.5 * GRAVITY * t * t, epsilon = 1e-6);
    assert_eq!(state.angular_rate, Vector3::zeros());
}

#[test]
fn test_euler_angles_stay_wrapped() {
    let aircraft = create_ballistic_aircraft();
    let controls = ControlInputSnapshot::default();
    let env = EnvironmentSnapshot::calm();

    for rates in [Vector3::new(2.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.5)] {
        let initial = RigidBodyState {
            angular_rate: rates,
            position: Vector3::new(0.0, 0.0, -30_000.0),
            ..RigidBodyState::default()
        };
        let mut stepper = Stepper::new(
            aircraft.clone(),
            initial,
            &controls,
            &env,
            &SimulationConfig::default(),
        )
        .unwrap();

        for _ in 0..1_000 {
            let entry = stepper.step(&controls, &env).unwrap();
            assert_angles_canonical(&entry.state);
        }
        // Ten seconds at 2 rad/s is more than three full rolls.
        assert_relative_eq!(stepper.state().angular_rate, rates, epsilon = 1e-9);
    }
}

#[test]
fn test_elevator_pitches_nose_down() {
    let aircraft = create_navion();
    let trim = trimmed(&aircraft, &navion_cruise());
    let env = EnvironmentSnapshot::calm();
    let mut stepper = Stepper::new(
        aircraft,
        trim.state,
        &trim.controls,
        &env,
        &SimulationConfig::default(),
    )
    .unwrap();

    let pushed = trim
        .controls
        .clone()
        .with(ControlId::Elevator, trim.controls.elevator() + 0.05);
    for _ in 0..20 {
        stepper.step(&pushed, &env).unwrap();
    }
    assert!(stepper.state().angular_rate.y < 0.0);
    assert!(stepper.state().theta() < trim.state.theta());
}

#[test]
fn test_wind_changes_airspeed_not_ground_speed() {
    let aircraft = create_navion();
    let trim = trimmed(&aircraft, &navion_cruise());
    let calm = EnvironmentSnapshot::calm();
    // Headwind: heading north, wind from the north.
    let headwind = EnvironmentSnapshot::with_constant_wind(20.0, 0.0);

    let mut stepper = Stepper::new(
        aircraft,
        trim.state,
        &trim.controls,
        &calm,
        &SimulationConfig::default(),
    )
    .unwrap();
    let entry = stepper.step(&trim.controls, &headwind).unwrap();

    assert_relative_eq!(
        entry.derived.true_airspeed,
        navion_cruise().airspeed + 20.0,
        epsilon = 0.5
    );
    assert_relative_eq!(
        entry.state.ned_velocity().norm(),
        navion_cruise().airspeed,
        epsilon = 0.5
    );
}
