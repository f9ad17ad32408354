//! Simulation engine that drives components through the TOU calendar.

use tracing::{debug, info, warn};

use crate::components::types::{Component, SolvedParams, StepInfo, TimestepInputs};
use crate::error::SimResult;

use super::clock::Clock;
use super::tou::TouSchedules;
use super::types::{InletCondition, SimConfig, StepResult};

/// Simulation engine owning the schedules, the components, and configuration.
///
/// Components are held as trait objects so that any model implementing
/// [`Component`] can be driven by the same loop.
pub struct Engine {
    config: SimConfig,
    schedules: TouSchedules,
    inlet: InletCondition,
    components: Vec<Box<dyn Component>>,
    solved: Vec<SolvedParams>,
}

impl Engine {
    /// Creates a new engine and initializes every component.
    ///
    /// # Arguments
    ///
    /// * `config` - Run configuration
    /// * `schedules` - Expanded operating and pricing schedules
    /// * `inlet` - Inlet HTF condition
    /// * `components` - Component models to drive
    ///
    /// # Errors
    ///
    /// Returns the first component `init` failure.
    pub fn new(
        config: SimConfig,
        schedules: TouSchedules,
        inlet: InletCondition,
        mut components: Vec<Box<dyn Component>>,
    ) -> SimResult<Self> {
        let solved = components
            .iter_mut()
            .map(|c| c.init())
            .collect::<SimResult<Vec<_>>>()?;
        debug!(components = components.len(), "engine constructed");
        Ok(Self {
            config,
            schedules,
            inlet,
            components,
            solved,
        })
    }

    /// Executes one simulation timestep and returns the result.
    ///
    /// Each component is evaluated `calls_per_step` times with the flow set by
    /// its design flow, the operating period's turbine fraction, and the inlet
    /// flow fraction, then converged.
    ///
    /// # Errors
    ///
    /// Returns a range error if the step ends outside the schedule year, or
    /// any error raised while converging a component.
    pub fn step(&mut self, step: &StepInfo) -> SimResult<StepResult> {
        let tou = self.schedules.lookup(step.time_end_s)?;
        let calls = self.config.calls_per_step;

        let mut m_dot_kg_per_hr = 0.0;
        let mut q_dot_mwt = 0.0;
        let mut w_dot_pump_mwe = 0.0;
        let mut success = true;

        for (component, solved) in self.components.iter_mut().zip(&self.solved) {
            let m_dot = solved.m_dot_design_kg_per_hr
                * tou.turbine_fraction
                * self.inlet.flow_fraction;

            let mut q_sum = 0.0;
            let mut pump_sum = 0.0;
            for call_index in 0..calls {
                let out = component.call(&TimestepInputs {
                    inlet_temp_c: self.inlet.temperature_c,
                    m_dot_kg_per_hr: m_dot,
                    step: *step,
                    call_index,
                });
                if !out.success {
                    warn!(
                        component = component.component_type(),
                        timestep = step.index,
                        "component evaluation failed"
                    );
                }
                success &= out.success;
                q_sum += out.q_dot_htf_mwt;
                pump_sum += out.w_dot_htf_pump_mwe;
            }
            component.converged(step)?;

            m_dot_kg_per_hr += m_dot;
            q_dot_mwt += q_sum / calls as f64;
            w_dot_pump_mwe += pump_sum / calls as f64;
        }

        Ok(StepResult {
            timestep: step.index,
            time_hr: step.time_end_s / 3600.0,
            operating_period: tou.operating_period,
            pricing_period: tou.pricing_period,
            turbine_fraction: tou.turbine_fraction,
            price_multiplier: tou.price_multiplier,
            inlet_temp_c: self.inlet.temperature_c,
            m_dot_kg_per_hr,
            q_dot_mwt,
            w_dot_pump_mwe,
            success,
        })
    }

    /// Executes all timesteps and returns the complete step record vector.
    ///
    /// # Errors
    ///
    /// Stops at the first failing step; see [`Engine::step`].
    pub fn run(&mut self) -> SimResult<Vec<StepResult>> {
        let total = self.config.total_steps;
        info!(
            steps = total,
            step_s = self.config.step_s,
            components = self.components.len(),
            "starting run"
        );

        let mut results = Vec::with_capacity(total);
        let mut clock = Clock::new(total, self.config.step_s);
        while let Some(step) = clock.tick() {
            results.push(self.step(&step)?);
        }

        info!(steps = results.len(), "run finished");
        Ok(results)
    }

    /// Returns the driven components (for output export).
    pub fn components(&self) -> &[Box<dyn Component>] {
        &self.components
    }

    /// Returns the design parameters published by each component's `init`.
    pub fn solved_params(&self) -> &[SolvedParams] {
        &self.solved
    }

    /// Returns the TOU schedules.
    pub fn schedules(&self) -> &TouSchedules {
        &self.schedules
    }

    /// Returns a reference to the run configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::heat_sink::{HeatSink, HeatSinkOutput, HeatSinkParams};
    use crate::error::ErrorKind;
    use crate::reporting::Quantity;

    fn sink() -> Box<dyn Component> {
        Box::new(HeatSink::new(HeatSinkParams {
            hot_temp_design: Some(300.0),
            cold_temp_design: Some(250.0),
            thermal_duty_design: Some(10.0),
            pump_power_coefficient: Some(0.5),
            fluid: None,
        }))
    }

    fn design_inlet() -> InletCondition {
        InletCondition {
            temperature_c: 300.0,
            flow_fraction: 1.0,
        }
    }

    #[test]
    fn uniform_run_delivers_design_duty() {
        let mut engine = Engine::new(
            SimConfig::new(3600.0, 24, 1),
            TouSchedules::uniform(false),
            design_inlet(),
            vec![sink()],
        )
        .unwrap();
        let results = engine.run().unwrap();
        assert_eq!(results.len(), 24);
        for r in &results {
            assert!((r.q_dot_mwt - 10.0).abs() < 1e-9);
            assert_eq!(r.operating_period, 1);
            assert!(r.success);
        }

        let mut q = [0.0; 24];
        let n = engine.components()[0].export_output(HeatSinkOutput::QDotHeatSink.index(), &mut q);
        assert_eq!(n, 24);
        assert!(q.iter().all(|v| (v - 10.0).abs() < 1e-9));
    }

    #[test]
    fn repeated_calls_average_to_single_call() {
        let mut once = Engine::new(
            SimConfig::new(3600.0, 3, 1),
            TouSchedules::uniform(false),
            design_inlet(),
            vec![sink()],
        )
        .unwrap();
        let mut thrice = Engine::new(
            SimConfig::new(3600.0, 3, 3),
            TouSchedules::uniform(false),
            design_inlet(),
            vec![sink()],
        )
        .unwrap();
        let a = once.run().unwrap();
        let b = thrice.run().unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert!((x.q_dot_mwt - y.q_dot_mwt).abs() < 1e-9);
        }
    }

    #[test]
    fn failed_component_init_aborts_construction() {
        let broken: Box<dyn Component> = Box::new(HeatSink::new(HeatSinkParams::default()));
        let err = Engine::new(
            SimConfig::new(3600.0, 1, 1),
            TouSchedules::uniform(false),
            design_inlet(),
            vec![broken],
        )
        .err()
        .map(|e| e.kind());
        assert_eq!(err, Some(ErrorKind::Config));
    }

    #[test]
    fn run_past_year_end_is_range_error() {
        let mut engine = Engine::new(
            SimConfig::new(3600.0, 8761, 1),
            TouSchedules::uniform(false),
            design_inlet(),
            vec![sink()],
        )
        .unwrap();
        assert_eq!(engine.run().unwrap_err().kind(), ErrorKind::Range);
    }
}
