use std::io::Write;

use approx::assert_relative_eq;
use tempfile::NamedTempFile;

use sixdof::{
    build_aircraft,
    components::{parse_records, AircraftSpec, ConfigError},
};

use crate::common::{create_navion, navion_cruise, trimmed};

fn write_records(spec: &AircraftSpec, skip: Option<&str>) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    writeln!(file, "# {} exported for testing", spec.name).unwrap();
    for (key, value) in spec.to_records() {
        if Some(key.as_str()) != skip {
            writeln!(file, "{} = {}", key, value).unwrap();
        }
    }
    file
}

#[test]
fn test_record_file_trims_like_builtin() {
    let file = write_records(&AircraftSpec::navion(), None);
    let loaded = build_aircraft(AircraftSpec::from_file(file.path()).unwrap()).unwrap();

    let from_file = trimmed(&loaded, &navion_cruise());
    let builtin = trimmed(&create_navion(), &navion_cruise());
    assert_relative_eq!(
        from_file.trim_state.longitudinal.alpha,
        builtin.trim_state.longitudinal.alpha,
        epsilon = 1e-6
    );
    assert_relative_eq!(
        from_file.controls.throttle(),
        builtin.controls.throttle(),
        epsilon = 1e-6
    );
}

#[test]
fn test_heavier_aircraft_trims_at_higher_alpha() {
    let navion = AircraftSpec::navion();
    let heavy = navion
        .with_mass_overrides(&parse_records("weight_fuel = 300\n").unwrap())
        .unwrap();
    assert_relative_eq!(heavy.mass.weight(), navion.mass.weight() + 300.0);

    let light = trimmed(&create_navion(), &navion_cruise());
    let heavy = trimmed(&build_aircraft(heavy).unwrap(), &navion_cruise());
    assert!(heavy.trim_state.longitudinal.alpha > light.trim_state.longitudinal.alpha);
    assert!(heavy.controls.throttle() > light.controls.throttle());
}

#[test]
fn test_missing_required_key() {
    let file = write_records(&AircraftSpec::navion(), Some("CM_alpha"));
    let err = AircraftSpec::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::MissingKey(key) if key == "CM_alpha"));
}

#[test]
fn test_unreadable_sources() {
    let err = AircraftSpec::from_file("/definitely/not/here.txt").unwrap_err();
    assert!(matches!(err, ConfigError::FileError(_)));

    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(b"name: [unterminated\n").unwrap();
    let err = AircraftSpec::from_yaml_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::YamlError(_)));

    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    file.write_all(b"wing_area = lots\n").unwrap();
    let err = AircraftSpec::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::RecordError { line: 1, .. }));
}
