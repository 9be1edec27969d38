//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from TOML
/// with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Run length, seeding, and batch parameters.
    #[serde(default)]
    pub simulation: SimulationSettings,
    /// Grid coverage and logging parameters.
    #[serde(default)]
    pub grid: GridSettings,
    /// Wallet and exchange parameters.
    #[serde(default)]
    pub economy: EconomySettings,
    /// Weather cycle and outage parameters.
    #[serde(default)]
    pub weather: WeatherSettings,
    /// Recovery resource pools and action costs.
    #[serde(default)]
    pub resources: ResourceSettings,
}

/// Run length, seeding, and batch parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSettings {
    /// Simulated seconds to run in batch mode (must be > 0).
    pub duration_s: u64,
    /// Master random seed.
    pub seed: u64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            duration_s: 120,
            seed: 42,
        }
    }
}

/// Grid coverage and logging parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridSettings {
    /// Radius within which a connected substation powers demand points.
    pub coverage_radius: f32,
    /// Grid event log capacity.
    pub log_capacity: usize,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            coverage_radius: 150.0,
            log_capacity: 8,
        }
    }
}

/// Wallet and exchange parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EconomySettings {
    /// Starting experience balance.
    pub initial_exp: u32,
    /// Starting coin balance.
    pub initial_coins: u32,
    /// Coins granted per EXP exchanged.
    pub exp_to_coin_ratio: u32,
}

impl Default for EconomySettings {
    fn default() -> Self {
        Self {
            initial_exp: 1000,
            initial_coins: 0,
            exp_to_coin_ratio: 10,
        }
    }
}

/// Weather cycle and outage parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeatherSettings {
    /// Seconds between weather transitions (must be > 0).
    pub change_interval_s: u32,
    /// Probability that an at-risk, operational station fails per
    /// transition (0.0–1.0).
    pub outage_probability: f32,
    /// Effective risk above which a station counts as at risk.
    pub risk_threshold: f32,
    /// Disaster event log capacity.
    pub log_capacity: usize,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            change_interval_s: 20,
            outage_probability: 0.3,
            risk_threshold: 2.0,
            log_capacity: 10,
        }
    }
}

/// Recovery resource pools and action costs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResourceSettings {
    /// Repair crew pool size; also the hard cap on returns.
    pub repair_crews: u32,
    /// Starting budget.
    pub budget: u32,
    /// Emergency power reserve; consumable, never replenished.
    pub emergency_power: u32,
    /// Budget cost of one crew deployment.
    pub crew_cost: u32,
    /// Budget cost of one emergency power injection.
    pub emergency_cost: u32,
    /// Seconds a deployed crew stays unavailable.
    pub crew_return_delay_s: u32,
    /// Risk reduction applied by emergency power.
    pub emergency_risk_reduction: f32,
}

impl Default for ResourceSettings {
    fn default() -> Self {
        Self {
            repair_crews: 5,
            budget: 100_000,
            emergency_power: 3,
            crew_cost: 5_000,
            emergency_cost: 10_000,
            crew_return_delay_s: 5,
            emergency_risk_reduction: 2.0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"weather.change_interval_s"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationSettings::default(),
            grid: GridSettings::default(),
            economy: EconomySettings::default(),
            weather: WeatherSettings::default(),
            resources: ResourceSettings::default(),
        }
    }

    /// Returns the storm-stress preset: rapid weather swings, likelier
    /// outages, and a squeezed budget.
    pub fn storm_stress() -> Self {
        Self {
            weather: WeatherSettings {
                change_interval_s: 10,
                outage_probability: 0.5,
                ..WeatherSettings::default()
            },
            resources: ResourceSettings {
                budget: 50_000,
                ..ResourceSettings::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the austerity preset: thin crews and reserves.
    pub fn austerity() -> Self {
        Self {
            resources: ResourceSettings {
                repair_crews: 3,
                budget: 40_000,
                emergency_power: 1,
                crew_return_delay_s: 8,
                ..ResourceSettings::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "storm_stress", "austerity"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "storm_stress" => Ok(Self::storm_stress()),
            "austerity" => Ok(Self::austerity()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.simulation.duration_s == 0 {
            errors.push(ConfigError {
                field: "simulation.duration_s".into(),
                message: "must be > 0".into(),
            });
        }

        if self.grid.coverage_radius <= 0.0 {
            errors.push(ConfigError {
                field: "grid.coverage_radius".into(),
                message: "must be > 0".into(),
            });
        }
        if self.grid.log_capacity == 0 {
            errors.push(ConfigError {
                field: "grid.log_capacity".into(),
                message: "must be > 0".into(),
            });
        }

        if self.economy.exp_to_coin_ratio == 0 {
            errors.push(ConfigError {
                field: "economy.exp_to_coin_ratio".into(),
                message: "must be > 0".into(),
            });
        }

        let w = &self.weather;
        if w.change_interval_s == 0 {
            errors.push(ConfigError {
                field: "weather.change_interval_s".into(),
                message: "must be > 0".into(),
            });
        }
        if !(0.0..=1.0).contains(&w.outage_probability) {
            errors.push(ConfigError {
                field: "weather.outage_probability".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }
        if !(0.0..=5.0).contains(&w.risk_threshold) {
            errors.push(ConfigError {
                field: "weather.risk_threshold".into(),
                message: "must be in [0.0, 5.0]".into(),
            });
        }
        if w.log_capacity == 0 {
            errors.push(ConfigError {
                field: "weather.log_capacity".into(),
                message: "must be > 0".into(),
            });
        }

        let r = &self.resources;
        if r.repair_crews == 0 {
            errors.push(ConfigError {
                field: "resources.repair_crews".into(),
                message: "must be > 0".into(),
            });
        }
        if r.crew_return_delay_s == 0 {
            errors.push(ConfigError {
                field: "resources.crew_return_delay_s".into(),
                message: "must be > 0".into(),
            });
        }
        if r.emergency_risk_reduction < 0.0 {
            errors.push(ConfigError {
                field: "resources.emergency_risk_reduction".into(),
                message: "must be >= 0".into(),
            });
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
duration_s = 300
seed = 99

[grid]
coverage_radius = 200.0
log_capacity = 12

[economy]
initial_exp = 500
initial_coins = 50
exp_to_coin_ratio = 5

[weather]
change_interval_s = 15
outage_probability = 0.4
risk_threshold = 2.5
log_capacity = 20

[resources]
repair_crews = 4
budget = 80000
emergency_power = 2
crew_cost = 4000
emergency_cost = 12000
crew_return_delay_s = 6
emergency_risk_reduction = 1.5
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.duration_s), Some(300));
        assert_eq!(cfg.as_ref().map(|c| c.weather.change_interval_s), Some(15));
        assert_eq!(cfg.as_ref().map(|c| c.resources.repair_crews), Some(4));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[weather]
change_interval_s = 20
bogus_field = true
"#;
        let result = ScenarioConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[simulation]
seed = 7
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.seed), Some(7));
        // Everything else keeps defaults.
        assert_eq!(cfg.as_ref().map(|c| c.simulation.duration_s), Some(120));
        assert_eq!(cfg.as_ref().map(|c| c.grid.coverage_radius), Some(150.0));
        assert_eq!(cfg.as_ref().map(|c| c.resources.repair_crews), Some(5));
    }

    #[test]
    fn validation_catches_zero_interval() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.weather.change_interval_s = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "weather.change_interval_s"));
    }

    #[test]
    fn validation_catches_bad_probability() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.weather.outage_probability = 1.5;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "weather.outage_probability"));
    }

    #[test]
    fn validation_catches_zero_radius() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.grid.coverage_radius = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "grid.coverage_radius"));
    }

    #[test]
    fn storm_stress_is_harsher_than_baseline() {
        let base = ScenarioConfig::baseline();
        let storm = ScenarioConfig::storm_stress();
        assert!(storm.weather.change_interval_s < base.weather.change_interval_s);
        assert!(storm.weather.outage_probability > base.weather.outage_probability);
        assert!(storm.resources.budget < base.resources.budget);
    }

    #[test]
    fn austerity_has_fewer_resources() {
        let base = ScenarioConfig::baseline();
        let lean = ScenarioConfig::austerity();
        assert!(lean.resources.repair_crews < base.resources.repair_crews);
        assert!(lean.resources.emergency_power < base.resources.emergency_power);
    }
}
