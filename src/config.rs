//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::components::heat_sink::HeatSinkParams;
use crate::error::{ScheduleKind, SimError, SimResult};
use crate::sim::calendar;
use crate::sim::schedule::ScheduleDefinition;
use crate::sim::tou::TouSchedules;
use crate::sim::types::{InletCondition, SimConfig};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Top-level scenario configuration parsed from TOML.
///
/// Absent schedule sections fall back to the uniform schedule. Heat sink
/// fields have no defaults; missing ones are reported when the sink is
/// initialized.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation timing and global parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Operating (turbine fraction) block schedule.
    #[serde(default)]
    pub operating_schedule: Option<ScheduleDefinition>,
    /// Pricing (price multiplier) block schedule.
    #[serde(default)]
    pub pricing_schedule: Option<ScheduleDefinition>,
    /// Heat sink design point.
    #[serde(default)]
    pub heat_sink: HeatSinkParams,
    /// Inlet HTF condition.
    #[serde(default)]
    pub inlet: InletConfig,
}

/// Simulation timing and global parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Whether the simulated year has 366 days.
    pub leap_year: bool,
    /// Timestep duration in seconds (must be > 0).
    pub step_seconds: f64,
    /// Number of timesteps; 0 runs the full year.
    pub steps: usize,
    /// Component evaluations per timestep (must be > 0).
    pub calls_per_step: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            leap_year: false,
            step_seconds: SECONDS_PER_HOUR,
            steps: 0,
            calls_per_step: 1,
        }
    }
}

/// Inlet HTF condition.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InletConfig {
    /// Inlet temperature (C); the heat sink's design hot temperature when absent.
    pub temperature: Option<f64>,
    /// Multiplier on design flow × turbine fraction.
    pub flow_fraction: f64,
}

impl Default for InletConfig {
    fn default() -> Self {
        Self {
            temperature: None,
            flow_fraction: 1.0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.step_seconds"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        SimError::Config {
            field: e.field,
            message: e.message,
        }
    }
}

fn reference_heat_sink() -> HeatSinkParams {
    HeatSinkParams {
        hot_temp_design: Some(574.0),
        cold_temp_design: Some(290.0),
        thermal_duty_design: Some(250.0),
        pump_power_coefficient: Some(0.55),
        fluid: None,
    }
}

/// Summer weekday afternoons as period 1, everything else as period 2.
fn summer_peak_schedule(peak: f64, off_peak: f64) -> ScheduleDefinition {
    let weekdays = (0..calendar::MONTHS)
        .map(|month| {
            (0..calendar::HOURS_PER_DAY)
                .map(|hour| {
                    if (5..=8).contains(&month) && (12..=18).contains(&hour) {
                        1
                    } else {
                        2
                    }
                })
                .collect()
        })
        .collect();
    ScheduleDefinition {
        weekdays,
        weekends: vec![vec![2; calendar::HOURS_PER_DAY]; calendar::MONTHS],
        values: vec![peak, off_peak],
    }
}

impl ScenarioConfig {
    /// Returns the uniform scenario: single-period schedules and a salt heat sink.
    pub fn uniform() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            operating_schedule: None,
            pricing_schedule: None,
            heat_sink: reference_heat_sink(),
            inlet: InletConfig::default(),
        }
    }

    /// Returns the summer-peak preset: full output and doubled prices on summer
    /// weekday afternoons, reduced output otherwise.
    pub fn summer_peak() -> Self {
        Self {
            operating_schedule: Some(summer_peak_schedule(1.0, 0.6)),
            pricing_schedule: Some(summer_peak_schedule(2.0, 0.8)),
            ..Self::uniform()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["uniform", "summer_peak"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "uniform" => Ok(Self::uniform()),
            "summer_peak" => Ok(Self::summer_peak()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Number of steps to run, resolving 0 to the whole year.
    pub fn total_steps(&self) -> usize {
        let s = &self.simulation;
        if s.steps > 0 {
            return s.steps;
        }
        let year_s = calendar::hours_in_year(s.leap_year) as f64 * SECONDS_PER_HOUR;
        (year_s / s.step_seconds).floor() as usize
    }

    /// Builds the run configuration.
    ///
    /// # Panics
    ///
    /// Panics if `simulation.step_seconds` or `simulation.calls_per_step` is
    /// not positive; call [`ScenarioConfig::validate`] first.
    pub fn sim_config(&self) -> SimConfig {
        SimConfig::new(
            self.simulation.step_seconds,
            self.total_steps(),
            self.simulation.calls_per_step,
        )
    }

    /// Validates and expands both schedules.
    ///
    /// # Errors
    ///
    /// Any schedule error, tagged with the schedule it came from.
    pub fn schedules(&self) -> SimResult<TouSchedules> {
        TouSchedules::init(
            self.operating_schedule
                .clone()
                .unwrap_or_else(ScheduleDefinition::uniform),
            self.pricing_schedule
                .clone()
                .unwrap_or_else(ScheduleDefinition::uniform),
            self.simulation.leap_year,
        )
    }

    /// Resolves the inlet condition.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if no inlet temperature is given and the heat
    /// sink has no design hot temperature to fall back on.
    pub fn inlet(&self) -> Result<InletCondition, ConfigError> {
        let temperature_c = self
            .inlet
            .temperature
            .or(self.heat_sink.hot_temp_design)
            .ok_or_else(|| {
                ConfigError::new(
                    "inlet.temperature",
                    "must be set when heat_sink.hot_temp_design is absent",
                )
            })?;
        Ok(InletCondition {
            temperature_c,
            flow_fraction: self.inlet.flow_fraction,
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. Heat sink design
    /// fields are checked by the sink itself on init.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        let step_ok = s.step_seconds.is_finite() && s.step_seconds > 0.0;
        if !step_ok {
            errors.push(ConfigError::new("simulation.step_seconds", "must be > 0"));
        }
        if s.calls_per_step == 0 {
            errors.push(ConfigError::new("simulation.calls_per_step", "must be > 0"));
        }
        let hours = calendar::hours_in_year(s.leap_year);
        if step_ok && s.steps as f64 * s.step_seconds > hours as f64 * SECONDS_PER_HOUR {
            errors.push(ConfigError::new(
                "simulation.steps",
                format!("run must end within the {hours}-hour year"),
            ));
        }

        match self.inlet() {
            Ok(inlet) if !inlet.temperature_c.is_finite() => {
                errors.push(ConfigError::new("inlet.temperature", "must be finite"));
            }
            Ok(_) => {}
            Err(e) => errors.push(e),
        }
        let ff = self.inlet.flow_fraction;
        if !(ff.is_finite() && ff >= 0.0) {
            errors.push(ConfigError::new("inlet.flow_fraction", "must be >= 0"));
        }

        if let Err(e) = self.schedules() {
            let field = match &e {
                SimError::Schedule {
                    kind: ScheduleKind::Pricing,
                    ..
                } => "pricing_schedule",
                _ => "operating_schedule",
            };
            errors.push(ConfigError::new(field, e.to_string()));
        }

        errors
    }
}
