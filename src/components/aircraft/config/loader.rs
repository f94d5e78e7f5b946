use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::components::aircraft::config::aero_coef::{
    AircraftAeroCoefficients, DragCoefficients, LiftCoefficients, PitchCoefficients,
    RollCoefficients, SideForceCoefficients, YawCoefficients,
};
use crate::components::aircraft::config::propulsion::EngineSpec;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
    #[error("Malformed record on line {line}: {message}")]
    RecordError { line: usize, message: String },
    #[error("Missing aircraft parameter: {0}")]
    MissingKey(String),
    #[error("Unknown aircraft parameter: {0}")]
    UnknownKey(String),
    #[error("Invalid aircraft configuration: {0}")]
    ValidationError(String),
}

/// Name-to-value mapping read from `key = value` records.
pub type Records = BTreeMap<String, f64>;

/// Parses `key = value` lines into a record map.
///
/// Blank lines and lines starting with `#` are skipped. A line without `=`, a
/// value that is not a number and a key given twice are errors.
pub fn parse_records(text: &str) -> Result<Records, ConfigError> {
    let mut records = Records::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::RecordError {
            line: index + 1,
            message: format!("expected `key = value`, got `{}`", line),
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::RecordError {
                line: index + 1,
                message: "empty key".to_string(),
            });
        }

        let value: f64 = value.trim().parse().map_err(|_| ConfigError::RecordError {
            line: index + 1,
            message: format!("`{}` is not a number", value.trim()),
        })?;

        if records.insert(key.to_string(), value).is_some() {
            return Err(ConfigError::RecordError {
                line: index + 1,
                message: format!("duplicate key `{}`", key),
            });
        }
    }

    Ok(records)
}

/// Aircraft definition as it appears in YAML: a name, optional engine list and
/// the same flat numeric keys the record format uses.
#[derive(Debug, Deserialize)]
pub struct RawAircraftConfig {
    pub name: String,
    #[serde(default)]
    pub engines: Option<Vec<EngineSpec>>,
    #[serde(flatten)]
    pub values: Records,
}

/// Reads keys out of a record map and remembers which ones were consumed, so
/// leftovers can be reported.
pub(crate) struct RecordReader<'a> {
    records: &'a Records,
    consumed: BTreeSet<&'a str>,
}

impl<'a> RecordReader<'a> {
    pub(crate) fn new(records: &'a Records) -> Self {
        Self {
            records,
            consumed: BTreeSet::new(),
        }
    }

    fn lookup(&mut self, key: &str) -> Option<f64> {
        let records: &'a Records = self.records;
        let (stored_key, value) = records.get_key_value(key)?;
        self.consumed.insert(stored_key.as_str());
        Some(*value)
    }

    pub(crate) fn required(&mut self, key: &str) -> Result<f64, ConfigError> {
        let value = self
            .lookup(key)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))?;
        if !value.is_finite() {
            return Err(ConfigError::ValidationError(format!(
                "{} must be finite, got {}",
                key, value
            )));
        }
        Ok(value)
    }

    pub(crate) fn optional(&mut self, key: &str) -> Result<Option<f64>, ConfigError> {
        match self.lookup(key) {
            Some(value) if !value.is_finite() => Err(ConfigError::ValidationError(format!(
                "{} must be finite, got {}",
                key, value
            ))),
            other => Ok(other),
        }
    }

    pub(crate) fn or(&mut self, key: &str, default: f64) -> Result<f64, ConfigError> {
        Ok(self.optional(key)?.unwrap_or(default))
    }

    fn group<const N: usize>(&mut self, keys: [&str; N]) -> Result<[f64; N], ConfigError> {
        let mut values = [0.0; N];
        for (value, key) in values.iter_mut().zip(keys) {
            *value = self.required(key)?;
        }
        Ok(values)
    }

    /// Errors on the first key nobody asked for.
    pub(crate) fn finish(self) -> Result<(), ConfigError> {
        match self
            .records
            .keys()
            .find(|key| !self.consumed.contains(key.as_str()))
        {
            Some(key) => Err(ConfigError::UnknownKey(key.clone())),
            None => Ok(()),
        }
    }
}

impl AircraftAeroCoefficients {
    /// Reads all six derivative groups. Every coefficient must be present; a
    /// derivative the airframe lacks is written as an explicit zero.
    pub(crate) fn from_records(reader: &mut RecordReader<'_>) -> Result<Self, ConfigError> {
        Ok(AircraftAeroCoefficients {
            lift: LiftCoefficients::from_values(reader.group(LiftCoefficients::KEYS)?),
            side_force: SideForceCoefficients::from_values(
                reader.group(SideForceCoefficients::KEYS)?,
            ),
            drag: DragCoefficients::from_values(reader.group(DragCoefficients::KEYS)?),
            roll: RollCoefficients::from_values(reader.group(RollCoefficients::KEYS)?),
            pitch: PitchCoefficients::from_values(reader.group(PitchCoefficients::KEYS)?),
            yaw: YawCoefficients::from_values(reader.group(YawCoefficients::KEYS)?),
        })
    }
}
