use std::f64::consts::{FRAC_PI_2, PI, TAU};

use super::constants::KNOTS_TO_FPS;

/// Convert knots to feet per second
#[inline]
pub fn knots_to_fps(knots: f64) -> f64 {
    knots * KNOTS_TO_FPS
}

/// Convert feet per second to knots
#[inline]
pub fn fps_to_knots(fps: f64) -> f64 {
    fps / KNOTS_TO_FPS
}

/// Convert degrees to radians
#[inline]
pub fn deg_to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// Convert radians to degrees
#[inline]
pub fn rad_to_deg(rad: f64) -> f64 {
    rad * 180.0 / PI
}

/// Wrap an angle into (-π, π].
pub fn wrap_pi(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Wrap an angle into [0, 2π).
pub fn wrap_two_pi(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Bring an Euler triple back into its canonical ranges:
/// phi in (-π, π], theta in [-π/2, π/2], psi in [0, 2π).
///
/// A pitch angle past the vertical is reflected, which is the same attitude
/// expressed with roll and heading rotated by π.
pub fn wrap_euler(phi: f64, theta: f64, psi: f64) -> (f64, f64, f64) {
    let mut phi = phi;
    let mut psi = psi;
    let mut theta = wrap_pi(theta);

    if theta > FRAC_PI_2 {
        theta = PI - theta;
        phi += PI;
        psi += PI;
    } else if theta < -FRAC_PI_2 {
        theta = -PI - theta;
        phi += PI;
        psi += PI;
    }

    (wrap_pi(phi), theta, wrap_two_pi(psi))
}
