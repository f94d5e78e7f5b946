use serde::{Deserialize, Serialize};

/// The six stability-derivative groups of one airframe.
///
/// Every group has a fixed set of fields regardless of aircraft type; a
/// derivative the airframe data does not provide is an explicit zero.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AircraftAeroCoefficients {
    pub lift: LiftCoefficients,
    pub side_force: SideForceCoefficients,
    pub drag: DragCoefficients,
    pub roll: RollCoefficients,
    pub pitch: PitchCoefficients,
    pub yaw: YawCoefficients,
}

/// Lift coefficients, stability axes
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiftCoefficients {
    /// Lift-curve slope (per rad).
    pub cl_alpha: f64,
    /// Lift coefficient at zero angle of attack.
    pub cl_0: f64,
    /// Lift due to non-dimensional pitch rate q·c/2V.
    pub cl_q: f64,
    /// Lift due to non-dimensional angle-of-attack rate α̇·c/2V.
    pub cl_alphadot: f64,
    /// Lift due to elevator deflection (per rad).
    pub cl_de: f64,
    /// Lift due to flap deflection (per rad).
    pub cl_df: f64,
}

/// Side force coefficients
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideForceCoefficients {
    pub cy_beta: f64,
    pub cy_dr: f64,
}

/// Drag coefficients, stability axes
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragCoefficients {
    /// Drag slope with angle of attack (per rad). Applied to signed α.
    pub cd_alpha: f64,
    /// Parasite drag.
    pub cd_0: f64,
    pub cd_df: f64,
    pub cd_de: f64,
    /// Drag increment with the gear fully extended.
    pub cd_dg: f64,
}

/// Rolling moment coefficients, body axes
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollCoefficients {
    /// Dihedral effect.
    pub cl_beta: f64,
    /// Roll damping, per non-dimensional p·b/2V.
    pub cl_p: f64,
    pub cl_r: f64,
    pub cl_da: f64,
    pub cl_dr: f64,
}

/// Pitching moment coefficients, body axes
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchCoefficients {
    /// Static longitudinal stability (negative when stable).
    pub cm_alpha: f64,
    pub cm_0: f64,
    /// Pitch damping, per non-dimensional q·c/2V.
    pub cm_q: f64,
    pub cm_alphadot: f64,
    pub cm_de: f64,
    pub cm_df: f64,
}

/// Yawing moment coefficients, body axes
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YawCoefficients {
    /// Weathercock stability (positive when stable).
    pub cn_beta: f64,
    pub cn_p: f64,
    pub cn_r: f64,
    pub cn_da: f64,
    pub cn_dr: f64,
}

impl AircraftAeroCoefficients {
    pub fn new(
        lift: LiftCoefficients,
        side_force: SideForceCoefficients,
        drag: DragCoefficients,
        roll: RollCoefficients,
        pitch: PitchCoefficients,
        yaw: YawCoefficients,
    ) -> Self {
        AircraftAeroCoefficients {
            lift,
            side_force,
            drag,
            roll,
            pitch,
            yaw,
        }
    }

    pub fn navion() -> AircraftAeroCoefficients {
        AircraftAeroCoefficients::new(
            LiftCoefficients::navion(),
            SideForceCoefficients::navion(),
            DragCoefficients::navion(),
            RollCoefficients::navion(),
            PitchCoefficients::navion(),
            YawCoefficients::navion(),
        )
    }

    /// Every derivative as a `(record key, value)` pair, group by group.
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        let mut entries = Vec::with_capacity(29);
        entries.extend(LiftCoefficients::KEYS.into_iter().zip(self.lift.values()));
        entries.extend(SideForceCoefficients::KEYS.into_iter().zip(self.side_force.values()));
        entries.extend(DragCoefficients::KEYS.into_iter().zip(self.drag.values()));
        entries.extend(RollCoefficients::KEYS.into_iter().zip(self.roll.values()));
        entries.extend(PitchCoefficients::KEYS.into_iter().zip(self.pitch.values()));
        entries.extend(YawCoefficients::KEYS.into_iter().zip(self.yaw.values()));
        entries
    }

    pub fn all_finite(&self) -> bool {
        self.entries().iter().all(|(_, v)| v.is_finite())
    }
}

impl LiftCoefficients {
    pub const KEYS: [&'static str; 6] =
        ["CL_alpha", "CL_0", "CL_q", "CL_alphadot", "CL_de", "CL_df"];

    pub fn navion() -> LiftCoefficients {
        LiftCoefficients::from_values([4.44, 0.41, 3.8, 0.0, 0.355, 0.355])
    }

    pub fn values(&self) -> [f64; 6] {
        [
            self.cl_alpha,
            self.cl_0,
            self.cl_q,
            self.cl_alphadot,
            self.cl_de,
            self.cl_df,
        ]
    }

    pub fn from_values(v: [f64; 6]) -> Self {
        LiftCoefficients {
            cl_alpha: v[0],
            cl_0: v[1],
            cl_q: v[2],
            cl_alphadot: v[3],
            cl_de: v[4],
            cl_df: v[5],
        }
    }
}

impl SideForceCoefficients {
    pub const KEYS: [&'static str; 2] = ["CY_beta", "CY_dr"];

    pub fn navion() -> SideForceCoefficients {
        SideForceCoefficients {
            cy_beta: -0.564,
            cy_dr: 0.157,
        }
    }

    pub fn values(&self) -> [f64; 2] {
        [self.cy_beta, self.cy_dr]
    }

    pub fn from_values(v: [f64; 2]) -> Self {
        SideForceCoefficients {
            cy_beta: v[0],
            cy_dr: v[1],
        }
    }
}

impl DragCoefficients {
    pub const KEYS: [&'static str; 5] = ["CD_alpha", "CD_0", "CD_df", "CD_de", "CD_dg"];

    pub fn navion() -> DragCoefficients {
        DragCoefficients::from_values([0.33, 0.025, 0.02, 0.001, 0.09])
    }

    pub fn values(&self) -> [f64; 5] {
        [self.cd_alpha, self.cd_0, self.cd_df, self.cd_de, self.cd_dg]
    }

    pub fn from_values(v: [f64; 5]) -> Self {
        DragCoefficients {
            cd_alpha: v[0],
            cd_0: v[1],
            cd_df: v[2],
            cd_de: v[3],
            cd_dg: v[4],
        }
    }
}

impl RollCoefficients {
    pub const KEYS: [&'static str; 5] = ["Cl_beta", "Cl_p", "Cl_r", "Cl_da", "Cl_dr"];

    pub fn navion() -> RollCoefficients {
        RollCoefficients::from_values([-0.074, -0.410, 0.107, -0.134, 0.107])
    }

    pub fn values(&self) -> [f64; 5] {
        [self.cl_beta, self.cl_p, self.cl_r, self.cl_da, self.cl_dr]
    }

    pub fn from_values(v: [f64; 5]) -> Self {
        RollCoefficients {
            cl_beta: v[0],
            cl_p: v[1],
            cl_r: v[2],
            cl_da: v[3],
            cl_dr: v[4],
        }
    }
}

impl PitchCoefficients {
    pub const KEYS: [&'static str; 6] =
        ["CM_alpha", "CM_0", "CM_q", "CM_alphadot", "CM_de", "CM_df"];

    pub fn navion() -> PitchCoefficients {
        PitchCoefficients::from_values([-0.683, 0.02, -9.96, -4.36, -0.923, -0.050])
    }

    pub fn values(&self) -> [f64; 6] {
        [
            self.cm_alpha,
            self.cm_0,
            self.cm_q,
            self.cm_alphadot,
            self.cm_de,
            self.cm_df,
        ]
    }

    pub fn from_values(v: [f64; 6]) -> Self {
        PitchCoefficients {
            cm_alpha: v[0],
            cm_0: v[1],
            cm_q: v[2],
            cm_alphadot: v[3],
            cm_de: v[4],
            cm_df: v[5],
        }
    }
}

impl YawCoefficients {
    pub const KEYS: [&'static str; 5] = ["CN_beta", "CN_p", "CN_r", "CN_da", "CN_dr"];

    pub fn navion() -> YawCoefficients {
        YawCoefficients::from_values([0.071, -0.0575, -0.125, -0.0035, -0.072])
    }

    pub fn values(&self) -> [f64; 5] {
        [self.cn_beta, self.cn_p, self.cn_r, self.cn_da, self.cn_dr]
    }

    pub fn from_values(v: [f64; 5]) -> Self {
        YawCoefficients {
            cn_beta: v[0],
            cn_p: v[1],
            cn_r: v[2],
            cn_da: v[3],
            cn_dr: v[4],
        }
    }
}
