//! Post-hoc KPI computation from simulation results.

use std::collections::BTreeMap;
use std::fmt;

use super::types::StepResult;

/// Aggregate key performance indicators derived from a complete simulation run.
///
/// Computed post-hoc from `Vec<StepResult>` to ensure consistency between
/// step data and reported metrics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KpiReport {
    /// Total heat absorbed (MWh).
    pub heat_delivered_mwh: f64,
    /// Total pumping energy (MWh).
    pub pumping_energy_mwh: f64,
    /// Heat weighted by the pricing period's multiplier (MWh).
    pub price_weighted_heat_mwh: f64,
    /// Highest step-average duty (MWt).
    pub peak_duty_mwt: f64,
    /// Simulated hours spent in each operating period.
    pub hours_by_operating_period: BTreeMap<u32, f64>,
    /// Number of steps with a failed evaluation.
    pub failed_steps: usize,
}

impl KpiReport {
    /// Computes all KPIs from the complete step record vector.
    ///
    /// # Arguments
    ///
    /// * `results` - Complete simulation step results
    /// * `dt_hours` - Timestep duration in hours
    pub fn from_results(results: &[StepResult], dt_hours: f64) -> Self {
        let mut report = Self::default();

        for r in results {
            let heat = r.q_dot_mwt * dt_hours;
            report.heat_delivered_mwh += heat;
            report.price_weighted_heat_mwh += heat * r.price_multiplier;
            report.pumping_energy_mwh += r.w_dot_pump_mwe * dt_hours;
            report.peak_duty_mwt = report.peak_duty_mwt.max(r.q_dot_mwt);
            *report
                .hours_by_operating_period
                .entry(r.operating_period)
                .or_insert(0.0) += dt_hours;
            if !r.success {
                report.failed_steps += 1;
            }
        }

        report
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- KPI Report ---")?;
        writeln!(f, "Heat delivered:        {:.2} MWh", self.heat_delivered_mwh)?;
        writeln!(f, "Price-weighted heat:   {:.2} MWh", self.price_weighted_heat_mwh)?;
        writeln!(f, "Pumping energy:        {:.4} MWh", self.pumping_energy_mwh)?;
        writeln!(f, "Peak duty:             {:.3} MWt", self.peak_duty_mwt)?;
        for (period, hours) in &self.hours_by_operating_period {
            writeln!(f, "Operating period {period:>2}:   {hours:.1} h")?;
        }
        write!(f, "Failed steps:          {}", self.failed_steps)
    }
}
