use crate::components::aircraft::config::InertiaCoefficients;
use crate::components::{ForceMoment, RigidBodyState, StateVector};

/// Flat-earth 6DOF state derivative.
///
/// `loads` is the total body-axis force (gravity included) and moment about
/// the CG. The Euler kinematics are singular at θ = ±90°; that attitude is
/// outside the supported envelope and is not special-cased.
pub fn rigid_body_derivative(
    state: &RigidBodyState,
    loads: &ForceMoment,
    mass: f64,
    c: &InertiaCoefficients,
) -> StateVector {
    let (u, v, w) = (state.velocity.x, state.velocity.y, state.velocity.z);
    let (p, q, r) = (state.angular_rate.x, state.angular_rate.y, state.angular_rate.z);
    let (phi, theta) = (state.attitude.x, state.attitude.y);
    let force = loads.force;
    let (l, m, n) = (loads.moment.x, loads.moment.y, loads.moment.z);

    let u_dot = r * v - q * w + force.x / mass;
    let v_dot = p * w - r * u + force.y / mass;
    let w_dot = q * u - p * v + force.z / mass;

    let p_dot = (c.c1 * r + c.c2 * p) * q + c.c3 * l + c.c4 * n;
    let q_dot = c.c5 * p * r - c.c6 * (p * p - r * r) + c.c7 * m;
    let r_dot = (c.c8 * p - c.c2 * r) * q + c.c4 * l + c.c9 * n;

    let (sin_phi, cos_phi) = phi.sin_cos();
    let phi_dot = p + theta.tan() * (q * sin_phi + r * cos_phi);
    let theta_dot = q * cos_phi - r * sin_phi;
    let psi_dot = (q * sin_phi + r * cos_phi) / theta.cos();

    let position_dot = state.body_to_ned() * state.velocity;

    StateVector::from_column_slice(&[
        u_dot,
        v_dot,
        w_dot,
        p_dot,
        q_dot,
        r_dot,
        phi_dot,
        theta_dot,
        psi_dot,
        position_dot.x,
        position_dot.y,
        position_dot.z,
    ])
}

/// Rate of change of angle of attack from the body velocity and its derivative.
pub fn alpha_rate(u: f64, w: f64, u_dot: f64, w_dot: f64) -> f64 {
    let denominator = u * u + w * w;
    if denominator > 1e-6 {
        (u * w_dot - w * u_dot) / denominator
    } else {
        0.0
    }
}
