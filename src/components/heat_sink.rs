use serde::Deserialize;
use tracing::{info, warn};

use crate::components::types::{
    Component, OperatingState, SolvedParams, SolverOutputs, StepInfo, TimestepInputs,
};
use crate::error::{SimError, SimResult};
use crate::fluids::{FluidSpec, HtfProperties};
use crate::reporting::{Aggregation, Quantity, ReportedOutputs};

/// Samples used for the mean specific heat across a temperature span.
const CP_AVE_POINTS: usize = 5;
/// Thermal input ceiling as a multiple of design; large enough to accept any field output.
const MAX_FRAC: f64 = 100.0;
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Reported outputs of the heat sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatSinkOutput {
    /// Thermal power absorbed (MWt).
    QDotHeatSink,
    /// HTF pumping power (MWe).
    WDotPumping,
    /// HTF mass flow (kg/s).
    MDotHtf,
}

impl Quantity for HeatSinkOutput {
    const ALL: &'static [Self] = &[Self::QDotHeatSink, Self::WDotPumping, Self::MDotHtf];

    fn index(self) -> usize {
        self as usize
    }

    fn label(self) -> &'static str {
        match self {
            Self::QDotHeatSink => "Q_DOT_HEAT_SINK",
            Self::WDotPumping => "W_DOT_PUMPING",
            Self::MDotHtf => "M_DOT_HTF",
        }
    }

    fn aggregation(self) -> Aggregation {
        Aggregation::TimeWeightedAverage
    }
}

/// Heat sink configuration. Required fields are optional here so that a
/// missing one is reported by [`HeatSink::init`] with its name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeatSinkParams {
    /// Design HTF inlet temperature (C).
    pub hot_temp_design: Option<f64>,
    /// Design HTF outlet temperature (C).
    pub cold_temp_design: Option<f64>,
    /// Design thermal duty (MWt).
    pub thermal_duty_design: Option<f64>,
    /// Pumping power per unit mass flow (kW/kg/s).
    pub pump_power_coefficient: Option<f64>,
    /// HTF selection; solar salt when absent.
    pub fluid: Option<FluidSpec>,
}

/// Validated design point.
#[derive(Debug, Clone)]
struct Design {
    t_hot_c: f64,
    t_cold_c: f64,
    q_dot_des_mwt: f64,
    pump_coef: f64,
    htf: HtfProperties,
    m_dot_des_kg_per_s: f64,
}

/// A thermal sink that accepts any HTF flow and returns it at the design cold
/// temperature.
///
/// Memoryless: each `call` depends only on its inputs and the design point.
#[derive(Debug, Clone)]
pub struct HeatSink {
    params: HeatSinkParams,
    design: Option<Design>,
    outputs: ReportedOutputs<HeatSinkOutput>,
}

impl HeatSink {
    pub fn new(params: HeatSinkParams) -> Self {
        Self {
            params,
            design: None,
            outputs: ReportedOutputs::new(),
        }
    }

    /// Design HTF mass flow (kg/s), once initialized.
    pub fn design_mass_flow_kg_per_s(&self) -> Option<f64> {
        self.design.as_ref().map(|d| d.m_dot_des_kg_per_s)
    }

    /// Committed aggregated outputs.
    pub fn reported(&self) -> &ReportedOutputs<HeatSinkOutput> {
        &self.outputs
    }

    fn validated_design(&self) -> SimResult<Design> {
        let p = &self.params;
        let t_cold_c = required(p.cold_temp_design, "cold_temp_design")?;
        let t_hot_c = required(p.hot_temp_design, "hot_temp_design")?;
        let q_dot_des_mwt = required(p.thermal_duty_design, "thermal_duty_design")?;
        let pump_coef = required(p.pump_power_coefficient, "pump_power_coefficient")?;

        if t_hot_c <= t_cold_c {
            return Err(SimError::config(
                "hot_temp_design",
                format!("({t_hot_c} C) must exceed cold_temp_design ({t_cold_c} C)"),
            ));
        }
        if q_dot_des_mwt <= 0.0 {
            return Err(SimError::config("thermal_duty_design", "must be > 0"));
        }

        let htf = HtfProperties::from_spec(&p.fluid.clone().unwrap_or_default())?;
        let cp_des = htf.cp_ave(t_cold_c, t_hot_c, CP_AVE_POINTS);
        let m_dot_des_kg_per_s = q_dot_des_mwt * 1.0e3 / (cp_des * (t_hot_c - t_cold_c));

        Ok(Design {
            t_hot_c,
            t_cold_c,
            q_dot_des_mwt,
            pump_coef,
            htf,
            m_dot_des_kg_per_s,
        })
    }
}

fn required(value: Option<f64>, field: &str) -> SimResult<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(SimError::config(field, format!("must be finite, got {v}"))),
        None => Err(SimError::config(field, "was not set before init")),
    }
}

impl Component for HeatSink {
    fn init(&mut self) -> SimResult<SolvedParams> {
        self.design = None;
        self.outputs = ReportedOutputs::new();
        let design = self.validated_design()?;

        let m_dot_design_kg_per_hr = design.m_dot_des_kg_per_s * SECONDS_PER_HOUR;
        let cutoff_frac = 0.0;
        let solved = SolvedParams {
            w_dot_des_mwe: 0.0,
            eta_des: 0.0,
            q_dot_des_mwt: design.q_dot_des_mwt,
            q_startup_mwh: 0.0,
            max_frac: MAX_FRAC,
            cutoff_frac,
            sb_frac: 0.0,
            t_htf_hot_ref_c: design.t_hot_c,
            m_dot_design_kg_per_hr,
            m_dot_min_kg_per_hr: m_dot_design_kg_per_hr * cutoff_frac,
            m_dot_max_kg_per_hr: m_dot_design_kg_per_hr * MAX_FRAC,
        };

        info!(
            m_dot_des_kg_per_s = design.m_dot_des_kg_per_s,
            q_dot_des_mwt = design.q_dot_des_mwt,
            "initialized heat sink"
        );
        self.design = Some(design);
        Ok(solved)
    }

    fn call(&mut self, inputs: &TimestepInputs) -> SolverOutputs {
        let Some(design) = &self.design else {
            warn!("heat sink called before init");
            return SolverOutputs::default();
        };

        let t_hot_c = inputs.inlet_temp_c;
        let m_dot_kg_per_s = inputs.m_dot_kg_per_hr / SECONDS_PER_HOUR;
        let cp = design.htf.cp_ave(design.t_cold_c, t_hot_c, CP_AVE_POINTS);

        // outlet always returns at the design cold temperature
        let q_dot_htf_mwt = m_dot_kg_per_s * cp * (t_hot_c - design.t_cold_c) / 1.0e3;
        let w_dot_htf_pump_mwe = design.pump_coef * m_dot_kg_per_s / 1.0e3;

        let duration = inputs.step.step_s;
        self.outputs
            .record(HeatSinkOutput::QDotHeatSink, q_dot_htf_mwt, duration);
        self.outputs
            .record(HeatSinkOutput::WDotPumping, w_dot_htf_pump_mwe, duration);
        self.outputs
            .record(HeatSinkOutput::MDotHtf, m_dot_kg_per_s, duration);

        SolverOutputs {
            p_cycle_mwe: 0.0,
            q_dot_htf_mwt,
            t_htf_cold_c: design.t_cold_c,
            m_dot_htf_kg_per_hr: inputs.m_dot_kg_per_hr,
            w_dot_htf_pump_mwe,
            w_cool_par_mwe: 0.0,
            time_required_su_s: 0.0,
            success: true,
        }
    }

    fn converged(&mut self, step: &StepInfo) -> SimResult<()> {
        self.outputs
            .close_interval(step.time_start_s(), step.time_end_s)
    }

    fn component_type(&self) -> &'static str {
        "HeatSink"
    }

    fn operating_state(&self) -> OperatingState {
        OperatingState::On
    }

    fn cold_startup_time_hr(&self) -> f64 {
        0.0
    }

    fn warm_startup_time_hr(&self) -> f64 {
        0.0
    }

    fn hot_startup_time_hr(&self) -> f64 {
        0.0
    }

    fn standby_energy_requirement_mwt(&self) -> f64 {
        0.0
    }

    fn cold_startup_energy_mwh(&self) -> f64 {
        0.0
    }

    fn warm_startup_energy_mwh(&self) -> f64 {
        0.0
    }

    fn hot_startup_energy_mwh(&self) -> f64 {
        0.0
    }

    fn max_thermal_power_mwt(&self) -> f64 {
        self.design
            .as_ref()
            .map_or(0.0, |d| MAX_FRAC * d.q_dot_des_mwt)
    }

    fn min_thermal_power_mwt(&self) -> f64 {
        0.0
    }

    fn max_startup_power_mwt(&self) -> f64 {
        0.0
    }

    fn htf_pumping_parasitic_coef(&self) -> f64 {
        self.design.as_ref().map_or(0.0, |d| {
            d.pump_coef * d.m_dot_des_kg_per_s / (d.q_dot_des_mwt * 1.0e3)
        })
    }

    fn output_labels(&self) -> Vec<&'static str> {
        HeatSinkOutput::ALL.iter().map(|q| q.label()).collect()
    }

    fn export_output(&self, index: usize, destination: &mut [f64]) -> usize {
        self.outputs.export(index, destination)
    }
}
