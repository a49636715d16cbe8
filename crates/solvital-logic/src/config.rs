//! Physiology configuration and validation.
//!
//! Every tunable rate the per-colonist model reads lives in
//! [`PhysiologyConfig`]. A config loads from JSON (missing keys take their
//! defaults) and is checked by [`validate_config`] before use.

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogError;

/// Tunable physiology parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysiologyConfig {
    /// Oxygen consumed per sol while active [kg].
    pub o2_consumption_nominal: f64,
    /// Oxygen consumed per sol while resting or asleep [kg].
    pub o2_consumption_resting: f64,
    /// Fraction of the requested oxygen that must be delivered.
    pub o2_minimum_fraction: f64,
    /// Lowest survivable air pressure [kPa].
    pub min_air_pressure: f64,
    /// Lowest survivable temperature [°C].
    pub min_temperature: f64,
    /// Highest survivable temperature [°C].
    pub max_temperature: f64,
    /// Water drunk per sol [kg].
    pub water_consumption: f64,
    /// Food eaten per sol [kg].
    pub food_consumption: f64,
    /// Sols without food before starvation can begin.
    pub starvation_start_sols: f64,
    /// Sols without water before dehydration can begin.
    pub dehydration_start_sols: f64,
    /// Relative spread applied to each colonist's onset thresholds.
    pub onset_variation: f64,
    /// Ticks between condition evaluations.
    pub condition_check_interval: u32,
    /// Stress [%] at which a breakdown becomes possible.
    pub stress_breakdown_threshold: f64,
    /// Fatigue [millisols] at which a collapse becomes possible.
    pub fatigue_collapse_threshold: f64,
    /// Fatigue recovered per millisol of sleep.
    pub sleep_fatigue_recovery: f64,
    /// Population average body mass [kg].
    pub average_mass: f64,
    /// Population average height [cm].
    pub average_height: f64,
}

impl Default for PhysiologyConfig {
    fn default() -> Self {
        Self {
            o2_consumption_nominal: 0.84,
            o2_consumption_resting: 0.64,
            o2_minimum_fraction: 0.5,
            min_air_pressure: 25.0,
            min_temperature: 0.0,
            max_temperature: 48.0,
            water_consumption: 3.0,
            food_consumption: 0.62,
            starvation_start_sols: 30.0,
            dehydration_start_sols: 3.0,
            onset_variation: 0.1,
            condition_check_interval: 7,
            stress_breakdown_threshold: 75.0,
            fatigue_collapse_threshold: 2_000.0,
            sleep_fatigue_recovery: 3.0,
            average_mass: 70.0,
            average_height: 170.0,
        }
    }
}

impl PhysiologyConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let config: Self = serde_json::from_str(json)?;
        let errors = validate_config(&config);
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(LoadError::Config(errors))
        }
    }

    /// Starvation onset in millisols of hunger, before per-colonist spread.
    pub fn starvation_onset(&self) -> f64 {
        self.starvation_start_sols * 1_000.0
    }

    /// Dehydration onset in millisols of thirst, before per-colonist spread.
    pub fn dehydration_onset(&self) -> f64 {
        self.dehydration_start_sols * 1_000.0
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("oxygen consumption must be positive (nominal {nominal}, resting {resting})")]
    NonPositiveOxygen { nominal: f64, resting: f64 },
    #[error("oxygen minimum fraction {0} outside (0, 1]")]
    InvalidOxygenFraction(f64),
    #[error("temperature bounds inverted: min {min} >= max {max}")]
    InvertedTemperatureBounds { min: f64, max: f64 },
    #[error("minimum air pressure {0} is negative")]
    NegativePressure(f64),
    #[error("onset of {0} must be positive")]
    NonPositiveOnset(&'static str),
    #[error("onset variation {0} outside [0, 0.5]")]
    InvalidOnsetVariation(f64),
    #[error("condition check interval must be at least 1")]
    ZeroCheckInterval,
    #[error("population average {0} must be positive")]
    NonPositiveAverage(&'static str),
    #[error("{0} must be positive")]
    NonPositiveRate(&'static str),
    #[error("{0} is not a finite number")]
    NotFinite(&'static str),
}

/// Error loading a JSON data file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid physiology config: {0:?}")]
    Config(Vec<ConfigError>),
    #[error("invalid complaint catalog: {0:?}")]
    Catalog(Vec<CatalogError>),
}

/// Validate a physiology config. Returns every problem found.
pub fn validate_config(config: &PhysiologyConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    let fields = [
        ("o2_consumption_nominal", config.o2_consumption_nominal),
        ("o2_consumption_resting", config.o2_consumption_resting),
        ("o2_minimum_fraction", config.o2_minimum_fraction),
        ("min_air_pressure", config.min_air_pressure),
        ("min_temperature", config.min_temperature),
        ("max_temperature", config.max_temperature),
        ("water_consumption", config.water_consumption),
        ("food_consumption", config.food_consumption),
        ("starvation_start_sols", config.starvation_start_sols),
        ("dehydration_start_sols", config.dehydration_start_sols),
        ("onset_variation", config.onset_variation),
        ("stress_breakdown_threshold", config.stress_breakdown_threshold),
        ("fatigue_collapse_threshold", config.fatigue_collapse_threshold),
        ("sleep_fatigue_recovery", config.sleep_fatigue_recovery),
        ("average_mass", config.average_mass),
        ("average_height", config.average_height),
    ];
    for (name, value) in fields {
        if !value.is_finite() {
            errors.push(ConfigError::NotFinite(name));
        }
    }

    if config.o2_consumption_nominal <= 0.0 || config.o2_consumption_resting <= 0.0 {
        errors.push(ConfigError::NonPositiveOxygen {
            nominal: config.o2_consumption_nominal,
            resting: config.o2_consumption_resting,
        });
    }
    if !(config.o2_minimum_fraction > 0.0 && config.o2_minimum_fraction <= 1.0) {
        errors.push(ConfigError::InvalidOxygenFraction(config.o2_minimum_fraction));
    }
    if config.min_temperature >= config.max_temperature {
        errors.push(ConfigError::InvertedTemperatureBounds {
            min: config.min_temperature,
            max: config.max_temperature,
        });
    }
    if config.min_air_pressure < 0.0 {
        errors.push(ConfigError::NegativePressure(config.min_air_pressure));
    }
    if config.starvation_start_sols <= 0.0 {
        errors.push(ConfigError::NonPositiveOnset("starvation"));
    }
    if config.dehydration_start_sols <= 0.0 {
        errors.push(ConfigError::NonPositiveOnset("dehydration"));
    }
    if !(0.0..=0.5).contains(&config.onset_variation) {
        errors.push(ConfigError::InvalidOnsetVariation(config.onset_variation));
    }
    if config.condition_check_interval == 0 {
        errors.push(ConfigError::ZeroCheckInterval);
    }
    if config.average_mass <= 0.0 {
        errors.push(ConfigError::NonPositiveAverage("mass"));
    }
    if config.average_height <= 0.0 {
        errors.push(ConfigError::NonPositiveAverage("height"));
    }

    // NaN fails every comparison, so it is reported once above.
    let rates = [
        ("food_consumption", config.food_consumption),
        ("water_consumption", config.water_consumption),
        ("sleep_fatigue_recovery", config.sleep_fatigue_recovery),
        ("stress_breakdown_threshold", config.stress_breakdown_threshold),
        ("fatigue_collapse_threshold", config.fatigue_collapse_threshold),
    ];
    for (name, value) in rates {
        if value <= 0.0 {
            errors.push(ConfigError::NonPositiveRate(name));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&PhysiologyConfig::default()).is_empty());
    }

    #[test]
    fn missing_keys_take_defaults() {
        let config = PhysiologyConfig::from_json(r#"{ "condition_check_interval": 3 }"#).unwrap();
        assert_eq!(config.condition_check_interval, 3);
        assert_eq!(config.average_mass, PhysiologyConfig::default().average_mass);
    }

    #[test]
    fn zero_interval_rejected() {
        let mut config = PhysiologyConfig::default();
        config.condition_check_interval = 0;
        assert!(validate_config(&config).contains(&ConfigError::ZeroCheckInterval));
    }

    #[test]
    fn inverted_temperatures_rejected() {
        let mut config = PhysiologyConfig::default();
        config.min_temperature = 50.0;
        let errors = validate_config(&config);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvertedTemperatureBounds { .. })));
    }

    #[test]
    fn multiple_errors_reported() {
        let mut config = PhysiologyConfig::default();
        config.o2_minimum_fraction = 0.0;
        config.starvation_start_sols = -1.0;
        config.average_height = 0.0;
        assert_eq!(validate_config(&config).len(), 3);
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = PhysiologyConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn invalid_json_config_is_rejected() {
        let err = PhysiologyConfig::from_json(r#"{ "min_air_pressure": -3.0 }"#).unwrap_err();
        match err {
            LoadError::Config(errors) => {
                assert_eq!(errors, vec![ConfigError::NegativePressure(-3.0)]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_positive_consumption_rejected() {
        let err = PhysiologyConfig::from_json(
            r#"{ "food_consumption": -0.62, "water_consumption": 0.0 }"#,
        )
        .unwrap_err();
        match err {
            LoadError::Config(errors) => {
                assert_eq!(
                    errors,
                    vec![
                        ConfigError::NonPositiveRate("food_consumption"),
                        ConfigError::NonPositiveRate("water_consumption"),
                    ]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_positive_thresholds_rejected() {
        let mut config = PhysiologyConfig::default();
        config.sleep_fatigue_recovery = 0.0;
        config.stress_breakdown_threshold = -5.0;
        config.fatigue_collapse_threshold = 0.0;
        let errors = validate_config(&config);
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ConfigError::NonPositiveRate("sleep_fatigue_recovery")));
        assert!(errors.contains(&ConfigError::NonPositiveRate("stress_breakdown_threshold")));
        assert!(errors.contains(&ConfigError::NonPositiveRate("fatigue_collapse_threshold")));
    }

    #[test]
    fn non_finite_values_rejected() {
        let mut config = PhysiologyConfig::default();
        config.food_consumption = f64::NAN;
        config.max_temperature = f64::INFINITY;
        config.average_mass = f64::NAN;
        let errors = validate_config(&config);
        assert!(errors.contains(&ConfigError::NotFinite("food_consumption")));
        assert!(errors.contains(&ConfigError::NotFinite("max_temperature")));
        assert!(errors.contains(&ConfigError::NotFinite("average_mass")));
        assert!(!errors.contains(&ConfigError::NonPositiveRate("food_consumption")));
    }

    #[test]
    fn onsets_in_millisols() {
        let config = PhysiologyConfig::default();
        assert_eq!(config.dehydration_onset(), 3_000.0);
        assert_eq!(config.starvation_onset(), 30_000.0);
    }
}
