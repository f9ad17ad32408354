//! Common types and the lifecycle contract shared by all component models.

use crate::error::SimResult;

/// Timing of the step being evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepInfo {
    /// Zero-based step index.
    pub index: usize,
    /// Simulated time at the end of the step (s since the start of the year).
    pub time_end_s: f64,
    /// Step duration (s).
    pub step_s: f64,
}

impl StepInfo {
    pub fn new(index: usize, time_end_s: f64, step_s: f64) -> Self {
        Self {
            index,
            time_end_s,
            step_s,
        }
    }

    /// Simulated time at the start of the step (s).
    pub fn time_start_s(&self) -> f64 {
        self.time_end_s - self.step_s
    }
}

/// Inputs for one evaluation of a component within a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimestepInputs {
    /// HTF inlet temperature (C).
    pub inlet_temp_c: f64,
    /// HTF mass flow rate (kg/hr).
    pub m_dot_kg_per_hr: f64,
    /// Step timing.
    pub step: StepInfo,
    /// Zero-based index of this evaluation within the step.
    pub call_index: usize,
}

/// Outputs of one evaluation, consumed by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SolverOutputs {
    /// Electric output (MWe).
    pub p_cycle_mwe: f64,
    /// Thermal power taken from the HTF (MWt).
    pub q_dot_htf_mwt: f64,
    /// HTF outlet temperature (C).
    pub t_htf_cold_c: f64,
    /// HTF mass flow rate (kg/hr).
    pub m_dot_htf_kg_per_hr: f64,
    /// HTF pumping power (MWe).
    pub w_dot_htf_pump_mwe: f64,
    /// Cooling parasitic (MWe).
    pub w_cool_par_mwe: f64,
    /// Remaining startup time (s).
    pub time_required_su_s: f64,
    pub success: bool,
}

/// Design-point parameters published by [`Component::init`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolvedParams {
    /// Design electric output (MWe).
    pub w_dot_des_mwe: f64,
    /// Design efficiency (-).
    pub eta_des: f64,
    /// Design thermal input (MWt).
    pub q_dot_des_mwt: f64,
    /// Startup energy (MWt-hr).
    pub q_startup_mwh: f64,
    /// Maximum thermal input as a fraction of design (-).
    pub max_frac: f64,
    /// Minimum thermal input as a fraction of design (-).
    pub cutoff_frac: f64,
    /// Standby thermal input as a fraction of design (-).
    pub sb_frac: f64,
    /// Design HTF hot temperature (C).
    pub t_htf_hot_ref_c: f64,
    /// Design HTF mass flow (kg/hr).
    pub m_dot_design_kg_per_hr: f64,
    /// Minimum HTF mass flow (kg/hr).
    pub m_dot_min_kg_per_hr: f64,
    /// Maximum HTF mass flow (kg/hr).
    pub m_dot_max_kg_per_hr: f64,
}

/// Operating mode of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingState {
    Off,
    Startup,
    On,
    Standby,
}

/// Lifecycle shared by every component model.
///
/// `init` once, then per step any number of `call`s followed by one
/// `converged`. Outputs recorded during the step are committed by `converged`.
pub trait Component: Send {
    /// Validates configuration and sizes the design point.
    ///
    /// # Errors
    ///
    /// Any configuration defect; the component stays unusable on failure.
    fn init(&mut self) -> SimResult<SolvedParams>;

    /// Evaluates the component for the current step.
    fn call(&mut self, inputs: &TimestepInputs) -> SolverOutputs;

    /// Accepts the step, committing reported outputs for it.
    ///
    /// # Errors
    ///
    /// Propagates reporting errors such as out-of-order steps.
    fn converged(&mut self, step: &StepInfo) -> SimResult<()>;

    /// Human-readable type name.
    fn component_type(&self) -> &'static str;

    fn operating_state(&self) -> OperatingState;

    /// Cold startup time (hr).
    fn cold_startup_time_hr(&self) -> f64;

    /// Warm startup time (hr).
    fn warm_startup_time_hr(&self) -> f64;

    /// Hot startup time (hr).
    fn hot_startup_time_hr(&self) -> f64;

    /// Thermal power needed to hold standby (MWt).
    fn standby_energy_requirement_mwt(&self) -> f64;

    /// Cold startup energy (MWh).
    fn cold_startup_energy_mwh(&self) -> f64;

    /// Warm startup energy (MWh).
    fn warm_startup_energy_mwh(&self) -> f64;

    /// Hot startup energy (MWh).
    fn hot_startup_energy_mwh(&self) -> f64;

    /// Largest accepted thermal input (MWt).
    fn max_thermal_power_mwt(&self) -> f64;

    /// Smallest accepted thermal input (MWt).
    fn min_thermal_power_mwt(&self) -> f64;

    /// Largest thermal input during startup (MWt).
    fn max_startup_power_mwt(&self) -> f64;

    /// HTF pumping power per unit thermal power (kWe/kWt).
    fn htf_pumping_parasitic_coef(&self) -> f64;

    /// Labels of the reported outputs, in index order.
    fn output_labels(&self) -> Vec<&'static str>;

    /// Copies the committed series of reported output `index` into `destination`.
    ///
    /// Returns the number of values written; unknown indices write nothing.
    fn export_output(&self, index: usize, destination: &mut [f64]) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_start_is_end_minus_duration() {
        let step = StepInfo::new(1, 7200.0, 3600.0);
        assert_eq!(step.time_start_s(), 3600.0);
    }

    #[test]
    fn default_outputs_are_unsuccessful() {
        let out = SolverOutputs::default();
        assert!(!out.success);
        assert_eq!(out.q_dot_htf_mwt, 0.0);
    }
}
