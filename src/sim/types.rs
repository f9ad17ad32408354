//! Core simulation types: run configuration and per-step records.

use std::fmt;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Centralized run configuration.
///
/// # Examples
///
/// ```
/// use tou_sim::sim::types::SimConfig;
///
/// let cfg = SimConfig::new(1800.0, 48, 1);
/// assert_eq!(cfg.dt_hours(), 0.5);
/// assert_eq!(cfg.total_steps, 48);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Duration of one timestep (s).
    pub step_s: f64,
    /// Number of timesteps to run.
    pub total_steps: usize,
    /// Component evaluations per timestep before it is accepted.
    pub calls_per_step: usize,
}

impl SimConfig {
    /// Creates a new run configuration.
    ///
    /// # Arguments
    ///
    /// * `step_s` - Timestep duration in seconds (must be > 0)
    /// * `total_steps` - Number of timesteps to run
    /// * `calls_per_step` - Evaluations per timestep (must be > 0)
    ///
    /// # Panics
    ///
    /// Panics if `step_s` is not positive or `calls_per_step` is zero.
    pub fn new(step_s: f64, total_steps: usize, calls_per_step: usize) -> Self {
        assert!(step_s > 0.0, "step_s must be > 0");
        assert!(calls_per_step > 0, "calls_per_step must be > 0");
        Self {
            step_s,
            total_steps,
            calls_per_step,
        }
    }

    /// Timestep duration in hours.
    pub fn dt_hours(&self) -> f64 {
        self.step_s / SECONDS_PER_HOUR
    }
}

/// Inlet HTF condition applied to every component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InletCondition {
    /// HTF inlet temperature (C).
    pub temperature_c: f64,
    /// Multiplier on design flow × turbine fraction (-).
    pub flow_fraction: f64,
}

/// Complete record of one simulation timestep.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Timestep index.
    pub timestep: usize,
    /// Simulated time at the end of the step (hr).
    pub time_hr: f64,
    /// Active operating period id.
    pub operating_period: u32,
    /// Active pricing period id.
    pub pricing_period: u32,
    /// Turbine fraction of the operating period.
    pub turbine_fraction: f64,
    /// Price multiplier of the pricing period.
    pub price_multiplier: f64,
    /// HTF inlet temperature (C).
    pub inlet_temp_c: f64,
    /// Total HTF mass flow sent to components (kg/hr).
    pub m_dot_kg_per_hr: f64,
    /// Total thermal power absorbed, averaged over the step (MWt).
    pub q_dot_mwt: f64,
    /// Total pumping power, averaged over the step (MWe).
    pub w_dot_pump_mwe: f64,
    /// Whether every evaluation in the step succeeded.
    pub success: bool,
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>4} ({:>6.0}h) | op={} ({:.2})  price={} (x{:.2}) | \
             m_dot={:>9.1} kg/hr  q={:>7.3} MWt  pump={:.4} MWe ok={}",
            self.timestep,
            self.time_hr,
            self.operating_period,
            self.turbine_fraction,
            self.pricing_period,
            self.price_multiplier,
            self.m_dot_kg_per_hr,
            self.q_dot_mwt,
            self.w_dot_pump_mwe,
            self.success,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_config_basic() {
        let cfg = SimConfig::new(3600.0, 8760, 1);
        assert_eq!(cfg.total_steps, 8760);
        assert_eq!(cfg.dt_hours(), 1.0);
        assert_eq!(cfg.calls_per_step, 1);
    }

    #[test]
    fn sim_config_sub_hourly() {
        let cfg = SimConfig::new(900.0, 96, 3);
        assert_eq!(cfg.dt_hours(), 0.25);
    }

    #[test]
    #[should_panic]
    fn sim_config_zero_step_panics() {
        SimConfig::new(0.0, 1, 1);
    }

    #[test]
    #[should_panic]
    fn sim_config_zero_calls_panics() {
        SimConfig::new(3600.0, 1, 0);
    }

    #[test]
    fn step_result_display_does_not_panic() {
        let r = StepResult {
            timestep: 0,
            time_hr: 1.0,
            operating_period: 1,
            pricing_period: 2,
            turbine_fraction: 1.0,
            price_multiplier: 1.5,
            inlet_temp_c: 300.0,
            m_dot_kg_per_hr: 1000.0,
            q_dot_mwt: 2.5,
            w_dot_pump_mwe: 0.01,
            success: true,
        };
        let s = format!("{r}");
        assert!(s.contains("price=2"));
    }
}
