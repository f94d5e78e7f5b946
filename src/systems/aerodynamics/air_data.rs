use nalgebra::Vector3;

use crate::components::{AirData, RigidBodyState};
use crate::resources::EnvironmentSample;

/// Below this airspeed (ft/s) the flow angles and dynamic pressure are zeroed.
pub const MIN_AIRSPEED_THRESHOLD: f64 = 0.1;

/// Air-relative velocity, flow angles and dynamic pressure for `state` in the
/// sampled environment.
pub fn calculate_air_data(state: &RigidBodyState, environment: &EnvironmentSample) -> AirData {
    let density = environment.atmosphere.density;
    let wind_body = environment.wind_body;
    let relative_velocity = state.velocity - wind_body;
    let airspeed = relative_velocity.norm();

    if !(airspeed > MIN_AIRSPEED_THRESHOLD) {
        return AirData {
            true_airspeed: airspeed,
            density,
            relative_velocity,
            wind_velocity: wind_body,
            ..AirData::default()
        };
    }

    AirData {
        true_airspeed: airspeed,
        alpha: calculate_alpha(&relative_velocity),
        beta: calculate_beta(&relative_velocity, airspeed),
        dynamic_pressure: 0.5 * density * airspeed * airspeed,
        density,
        mach: airspeed / environment.atmosphere.speed_of_sound,
        relative_velocity,
        wind_velocity: wind_body,
    }
}

fn calculate_alpha(relative_velocity: &Vector3<f64>) -> f64 {
    relative_velocity.z.atan2(relative_velocity.x)
}

fn calculate_beta(relative_velocity: &Vector3<f64>, airspeed: f64) -> f64 {
    (relative_velocity.y / airspeed).clamp(-1.0, 1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::EnvironmentSnapshot;
    use approx::assert_relative_eq;

    fn sample(state: &RigidBodyState, env: EnvironmentSnapshot) -> AirData {
        let environment = env.sample(state.altitude(), &state.body_to_ned());
        calculate_air_data(state, &environment)
    }

    #[test]
    fn test_flow_angles() {
        let mut state = RigidBodyState::level(0.0, 5_000.0, 0.0);
        state.velocity = Vector3::new(200.0, 10.0, 20.0);
        let air = sample(&state, EnvironmentSnapshot::calm());

        assert_relative_eq!(air.true_airspeed, state.velocity.norm());
        assert_relative_eq!(air.alpha, (20.0f64 / 200.0).atan(), epsilon = 1e-12);
        assert_relative_eq!(air.beta, (10.0 / state.velocity.norm()).asin(), epsilon = 1e-12);
        assert_relative_eq!(
            air.dynamic_pressure,
            0.5 * air.density * state.velocity.norm_squared(),
            epsilon = 1e-9
        );
        assert!(air.mach > 0.1 && air.mach < 0.3);
    }

    #[test]
    fn test_headwind_adds_airspeed() {
        let state = RigidBodyState::level(200.0, 1_000.0, 0.0);
        // Heading north into a 20 ft/s wind from the north.
        let air = sample(&state, EnvironmentSnapshot::with_constant_wind(20.0, 0.0));
        assert_relative_eq!(air.true_airspeed, 220.0, epsilon = 1e-9);
        assert_relative_eq!(air.alpha, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_airspeed_guard() {
        let state = RigidBodyState::level(0.05, 0.0, 0.0);
        let air = sample(&state, EnvironmentSnapshot::calm());
        assert_eq!(air.alpha, 0.0);
        assert_eq!(air.beta, 0.0);
        assert_eq!(air.dynamic_pressure, 0.0);
        assert_eq!(air.mach, 0.0);

        let mut backward = RigidBodyState::default();
        backward.velocity = Vector3::new(0.0, 0.0, 0.0);
        let air = sample(&backward, EnvironmentSnapshot::calm());
        assert!(air.alpha.is_finite() && air.beta.is_finite());
    }
}
