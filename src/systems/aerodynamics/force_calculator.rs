use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::components::{
    AirData, AircraftAeroCoefficients, AircraftGeometry, ControlInputSnapshot, ForceMoment,
};

/// Non-dimensional force and moment coefficients of one evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AeroCoefficientValues {
    pub c_lift: f64,
    pub c_drag: f64,
    pub c_side: f64,
    pub c_roll: f64,
    pub c_pitch: f64,
    pub c_yaw: f64,
}

/// Aerodynamic loads about the CG together with the coefficients behind them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AeroForces {
    pub loads: ForceMoment,
    pub coefficients: AeroCoefficientValues,
}

/// Evaluates the linear stability-derivative model and returns body-axis
/// force and moment about the CG.
///
/// # Arguments
/// * `geometry` - Wing reference dimensions and reference points.
/// * `coeffs` - Stability derivatives.
/// * `air_data` - Airspeed, flow angles and dynamic pressure.
/// * `angular_rate` - Body rates [p, q, r] (rad/s).
/// * `controls` - Control positions.
/// * `alpha_dot` - Rate of change of angle of attack (rad/s).
///
/// Lift and drag are built in stability axes and rotated into body axes. When
/// the aerodynamic center is offset from the CG the resulting moment arm is
/// included.
pub fn calculate_aerodynamic_forces_moments(
    geometry: &AircraftGeometry,
    coeffs: &AircraftAeroCoefficients,
    air_data: &AirData,
    angular_rate: &Vector3<f64>,
    controls: &ControlInputSnapshot,
    alpha_dot: f64,
) -> AeroForces {
    // air_data already zeroes q̄ below the airspeed guard
    if air_data.dynamic_pressure <= 0.0 {
        return AeroForces::default();
    }

    let alpha = air_data.alpha;
    let beta = air_data.beta;
    let q_dyn = air_data.dynamic_pressure;
    let airspeed = air_data.true_airspeed;

    let span = geometry.wing_span;
    let chord = geometry.mean_chord;
    let p_hat = angular_rate.x * span / (2.0 * airspeed);
    let q_hat = angular_rate.y * chord / (2.0 * airspeed);
    let r_hat = angular_rate.z * span / (2.0 * airspeed);
    let alpha_dot_hat = alpha_dot * chord / (2.0 * airspeed);

    let elevator = controls.elevator();
    let aileron = controls.aileron();
    let rudder = controls.rudder();
    let flaps = controls.flaps();
    let gear = controls.gear();

    let lift = &coeffs.lift;
    let c_lift = lift.cl_0
        + lift.cl_alpha * alpha
        + lift.cl_q * q_hat
        + lift.cl_alphadot * alpha_dot_hat
        + lift.cl_de * elevator
        + lift.cl_df * flaps;

    let drag = &coeffs.drag;
    let c_drag = drag.cd_0
        + drag.cd_alpha * alpha
        + drag.cd_de * elevator
        + drag.cd_df * flaps
        + drag.cd_dg * gear;

    let side = &coeffs.side_force;
    let c_side = side.cy_beta * beta + side.cy_dr * rudder;

    let roll = &coeffs.roll;
    let c_roll = roll.cl_beta * beta
        + roll.cl_p * p_hat
        + roll.cl_r * r_hat
        + roll.cl_da * aileron
        + roll.cl_dr * rudder;

    let pitch = &coeffs.pitch;
    let c_pitch = pitch.cm_0
        + pitch.cm_alpha * alpha
        + pitch.cm_q * q_hat
        + pitch.cm_alphadot * alpha_dot_hat
        + pitch.cm_de * elevator
        + pitch.cm_df * flaps;

    let yaw = &coeffs.yaw;
    let c_yaw = yaw.cn_beta * beta
        + yaw.cn_p * p_hat
        + yaw.cn_r * r_hat
        + yaw.cn_da * aileron
        + yaw.cn_dr * rudder;

    let qs = q_dyn * geometry.wing_area;
    let lift_force = qs * c_lift;
    let drag_force = qs * c_drag;
    let (sin_alpha, cos_alpha) = alpha.sin_cos();

    let force = Vector3::new(
        -drag_force * cos_alpha + lift_force * sin_alpha,
        qs * c_side,
        -drag_force * sin_alpha - lift_force * cos_alpha,
    );

    let moment = Vector3::new(qs * span * c_roll, qs * chord * c_pitch, qs * span * c_yaw)
        + geometry.aero_arm().cross(&force);

    AeroForces {
        loads: ForceMoment::new(force, moment),
        coefficients: AeroCoefficientValues {
            c_lift,
            c_drag,
            c_side,
            c_roll,
            c_pitch,
            c_yaw,
        },
    }
}
