use sixdof::{components::TrimCondition, utils::knots_to_fps};

/// 150 kt, 5,000 ft, wings level.
pub fn navion_cruise() -> TrimCondition {
    TrimCondition::straight_and_level(knots_to_fps(150.0), 5_000.0)
}

/// Level 3 deg/s turn to the right at cruise.
pub fn navion_rate_one_turn() -> TrimCondition {
    navion_cruise().with_turn_rate(3.0_f64.to_radians())
}
