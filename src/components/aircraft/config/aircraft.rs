use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::components::aircraft::config::loader::{
    parse_records, ConfigError, RawAircraftConfig, RecordReader, Records,
};
use crate::components::aircraft::config::{
    AircraftAeroCoefficients, AircraftGeometry, EngineKind, EngineSpec, FixedPitchPropSpec,
    MassProperties,
};

/// Immutable definition of one airframe: mass, geometry, stability derivatives
/// and engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftSpec {
    pub name: String,
    pub mass: MassProperties,
    pub geometry: AircraftGeometry,
    pub aero_coef: AircraftAeroCoefficients,
    pub engines: Vec<EngineSpec>,
}

impl Default for AircraftSpec {
    /// The Navion is the reference aircraft.
    fn default() -> Self {
        Self::navion()
    }
}

impl AircraftSpec {
    /// Creates an aircraft definition from a given source.
    pub fn new(source: AircraftSource) -> Result<Self, ConfigError> {
        let spec = match source {
            AircraftSource::Programmed(AircraftType::Navion) => Self::navion(),
            AircraftSource::File(path) => Self::from_file(path)?,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn navion() -> Self {
        Self {
            name: "Navion".to_string(),
            mass: MassProperties::navion(),
            geometry: AircraftGeometry::navion(),
            aero_coef: AircraftAeroCoefficients::navion(),
            engines: vec![EngineSpec::navion()],
        }
    }

    /// Loads a YAML definition (`.yaml`/`.yml`) or a `key = value` record file
    /// (anything else).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );

        if is_yaml {
            let raw: RawAircraftConfig = serde_yaml::from_str(&contents)?;
            Self::from_raw_config(raw)
        } else {
            let name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("Custom")
                .to_string();
            Self::from_records(name, &parse_records(&contents)?)
        }
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let raw: RawAircraftConfig = serde_yaml::from_str(&contents)?;
        Self::from_raw_config(raw)
    }

    fn from_raw_config(raw: RawAircraftConfig) -> Result<Self, ConfigError> {
        let mut spec = Self::from_records(raw.name, &raw.values)?;
        if let Some(engines) = raw.engines {
            spec.engines = engines;
            spec.validate()?;
        }
        Ok(spec)
    }

    /// Builds an aircraft from flat numeric records.
    ///
    /// Mass (`weight_empty`, `Ix`, `Iy`, `Iz`, `Ixz`), wing (`wing_area`,
    /// `wing_span`, `mean_chord`) and all 29 derivative keys are required.
    /// Reference points (`CG_x`.., `ac_x`..), fuel/payload weights and the
    /// single-engine keys (`engine_x`.., `max_bhp`, `max_rpm`, `prop_diameter`,
    /// `prop_efficiency`, `rpm_time_constant`) are optional. Unknown keys are
    /// rejected.
    pub fn from_records(name: impl Into<String>, records: &Records) -> Result<Self, ConfigError> {
        let mut reader = RecordReader::new(records);

        let mass = MassProperties {
            weight_empty: reader.required("weight_empty")?,
            weight_fuel: reader.or("weight_fuel", 0.0)?,
            weight_payload: reader.or("weight_payload", 0.0)?,
            ix: reader.required("Ix")?,
            iy: reader.required("Iy")?,
            iz: reader.required("Iz")?,
            ixz: reader.required("Ixz")?,
        };

        let geometry = AircraftGeometry::new(
            reader.required("wing_area")?,
            reader.required("wing_span")?,
            reader.required("mean_chord")?,
        )
        .with_reference_points(
            Vector3::new(
                reader.or("CG_x", 0.0)?,
                reader.or("CG_y", 0.0)?,
                reader.or("CG_z", 0.0)?,
            ),
            Vector3::new(
                reader.or("ac_x", 0.0)?,
                reader.or("ac_y", 0.0)?,
                reader.or("ac_z", 0.0)?,
            ),
        );

        let aero_coef = AircraftAeroCoefficients::from_records(&mut reader)?;

        let defaults = FixedPitchPropSpec::default();
        let prop = FixedPitchPropSpec {
            max_bhp: reader.or("max_bhp", defaults.max_bhp)?,
            max_rpm: reader.or("max_rpm", defaults.max_rpm)?,
            prop_diameter: reader.or("prop_diameter", defaults.prop_diameter)?,
            prop_efficiency: reader.or("prop_efficiency", defaults.prop_efficiency)?,
            rpm_time_constant: reader.or("rpm_time_constant", defaults.rpm_time_constant)?,
        };
        let engine = EngineSpec::fixed_pitch("Engine 1", 1, prop).at(Vector3::new(
            reader.or("engine_x", 0.0)?,
            reader.or("engine_y", 0.0)?,
            reader.or("engine_z", 0.0)?,
        ));

        reader.finish()?;

        let spec = Self {
            name: name.into(),
            mass,
            geometry,
            aero_coef,
            engines: vec![engine],
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Copy of this aircraft with mass properties replaced by whichever of
    /// `weight_empty`, `weight_fuel`, `weight_payload`, `Ix`, `Iy`, `Iz`, `Ixz`
    /// appear in `records`.
    pub fn with_mass_overrides(&self, records: &Records) -> Result<Self, ConfigError> {
        let mut reader = RecordReader::new(records);
        let current = self.mass;

        let mass = MassProperties {
            weight_empty: reader.or("weight_empty", current.weight_empty)?,
            weight_fuel: reader.or("weight_fuel", current.weight_fuel)?,
            weight_payload: reader.or("weight_payload", current.weight_payload)?,
            ix: reader.or("Ix", current.ix)?,
            iy: reader.or("Iy", current.iy)?,
            iz: reader.or("Iz", current.iz)?,
            ixz: reader.or("Ixz", current.ixz)?,
        };
        reader.finish()?;

        let spec = Self {
            mass,
            ..self.clone()
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Checks that the definition describes a physically meaningful airframe.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: String| Err(ConfigError::ValidationError(message));

        let mass = &self.mass;
        if !(mass.weight_empty.is_finite() && mass.weight_empty > 0.0) {
            return invalid(format!("weight_empty must be positive, got {}", mass.weight_empty));
        }
        for (name, value) in [("weight_fuel", mass.weight_fuel), ("weight_payload", mass.weight_payload)] {
            if !(value.is_finite() && value >= 0.0) {
                return invalid(format!("{} must be non-negative, got {}", name, value));
            }
        }
        for (name, value) in [("Ix", mass.ix), ("Iy", mass.iy), ("Iz", mass.iz)] {
            if !(value.is_finite() && value > 0.0) {
                return invalid(format!("{} must be positive, got {}", name, value));
            }
        }
        if !mass.ixz.is_finite() || mass.gamma() <= 0.0 {
            return invalid(format!("Ixz {} makes the inertia tensor singular", mass.ixz));
        }

        let geometry = &self.geometry;
        for (name, value) in [
            ("wing_area", geometry.wing_area),
            ("wing_span", geometry.wing_span),
            ("mean_chord", geometry.mean_chord),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return invalid(format!("{} must be positive, got {}", name, value));
            }
        }
        if !geometry
            .center_of_gravity
            .iter()
            .chain(geometry.aerodynamic_center.iter())
            .all(|c| c.is_finite())
        {
            return invalid("reference points must be finite".to_string());
        }

        if !self.aero_coef.all_finite() {
            return invalid("stability derivatives must be finite".to_string());
        }

        for engine in &self.engines {
            engine.check().map_err(ConfigError::ValidationError)?;
        }

        Ok(())
    }

    /// Flattens the definition back into records, the inverse of
    /// [`AircraftSpec::from_records`] for single-engine aircraft.
    pub fn to_records(&self) -> Records {
        let mut records = Records::new();
        let mut put = |key: &str, value: f64| {
            records.insert(key.to_string(), value);
        };

        put("weight_empty", self.mass.weight_empty);
        put("weight_fuel", self.mass.weight_fuel);
        put("weight_payload", self.mass.weight_payload);
        put("Ix", self.mass.ix);
        put("Iy", self.mass.iy);
        put("Iz", self.mass.iz);
        put("Ixz", self.mass.ixz);
        put("wing_area", self.geometry.wing_area);
        put("wing_span", self.geometry.wing_span);
        put("mean_chord", self.geometry.mean_chord);
        for (axis, index) in [("x", 0), ("y", 1), ("z", 2)] {
            put(&format!("CG_{}", axis), self.geometry.center_of_gravity[index]);
            put(&format!("ac_{}", axis), self.geometry.aerodynamic_center[index]);
        }
        for (key, value) in self.aero_coef.entries() {
            put(key, value);
        }

        if let Some(engine) = self.engines.first() {
            let EngineKind::FixedPitchProp(prop) = &engine.kind;
            put("max_bhp", prop.max_bhp);
            put("max_rpm", prop.max_rpm);
            put("prop_diameter", prop.prop_diameter);
            put("prop_efficiency", prop.prop_efficiency);
            put("rpm_time_constant", prop.rpm_time_constant);
            put("engine_x", engine.position.x);
            put("engine_y", engine.position.y);
            put("engine_z", engine.position.z);
        }

        records
    }
}

/// Where an aircraft definition comes from.
#[derive(Debug, Clone)]
pub enum AircraftSource {
    Programmed(AircraftType),
    File(PathBuf),
}

/// Aircraft with built-in definitions.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Hash, PartialEq, Eq)]
pub enum AircraftType {
    Navion,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_navion_is_valid() {
        let spec = AircraftSpec::new(AircraftSource::Programmed(AircraftType::Navion)).unwrap();
        assert_eq!(spec.name, "Navion");
        assert_eq!(spec.engines.len(), 1);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_records_round_trip_through_file() {
        let navion = AircraftSpec::navion();
        let mut file = NamedTempFile::new().unwrap();
        for (key, value) in navion.to_records() {
            writeln!(file, "{} = {}", key, value).unwrap();
        }

        let loaded = AircraftSpec::new(AircraftSource::File(file.path().to_path_buf())).unwrap();
        assert_eq!(loaded.mass, navion.mass);
        assert_eq!(loaded.aero_coef, navion.aero_coef);
        assert_eq!(loaded.geometry, navion.geometry);
        assert_eq!(loaded.engines[0].kind, navion.engines[0].kind);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let mut records = AircraftSpec::navion().to_records();
        records.insert("CL_beta".to_string(), 0.1);
        let err = AircraftSpec::from_records("typo", &records).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(k) if k == "CL_beta"));
    }

    #[test]
    fn test_invalid_mass_is_rejected() {
        let mut records = AircraftSpec::navion().to_records();
        records.insert("Iy".to_string(), 0.0);
        assert!(matches!(
            AircraftSpec::from_records("bad", &records),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_mass_overrides() {
        let navion = AircraftSpec::navion();
        let overrides = parse_records("weight_fuel = 240\nweight_payload = 340\n").unwrap();
        let loaded = navion.with_mass_overrides(&overrides).unwrap();

        assert_eq!(loaded.mass.weight(), 3330.0);
        assert_eq!(loaded.mass.ix, navion.mass.ix);
        assert_eq!(loaded.aero_coef, navion.aero_coef);

        let bad = parse_records("fuel = 10").unwrap();
        assert!(navion.with_mass_overrides(&bad).is_err());
    }

    #[test]
    fn test_yaml_definition_with_engines() {
        let mut yaml = String::from("name: Twin\nengines:\n");
        for (number, y) in [(1, -5.0), (2, 5.0)] {
            yaml.push_str(&format!(
                "  - name: E{number}\n    number: {number}\n    position: [0.0, {y}, 0.0]\n    kind:\n      FixedPitchProp:\n        max_bhp: 150.0\n        max_rpm: 2600.0\n        prop_diameter: 6.0\n        prop_efficiency: 0.8\n        rpm_time_constant: 0.4\n"
            ));
        }
        for (key, value) in AircraftSpec::navion().to_records() {
            if !key.starts_with("engine_") && !key.starts_with("max_") && !key.starts_with("prop_") && key != "rpm_time_constant" {
                yaml.push_str(&format!("{}: {}\n", key, value));
            }
        }

        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let spec = AircraftSpec::from_file(file.path()).unwrap();
        assert_eq!(spec.name, "Twin");
        assert_eq!(spec.engines.len(), 2);
        assert_eq!(spec.engines[1].position, Vector3::new(0.0, 5.0, 0.0));
    }
}
