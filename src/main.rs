//! TOU simulator entry point: CLI wiring and config-driven engine construction.

mod cli;

use std::process;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use tou_sim::components::heat_sink::HeatSink;
use tou_sim::components::types::Component;
use tou_sim::config::ScenarioConfig;
use tou_sim::error::SimResult;
use tou_sim::io::export::export_csv;
use tou_sim::sim::engine::Engine;
use tou_sim::sim::kpi::KpiReport;
use tou_sim::sim::types::StepResult;

use crate::cli::Args;

/// Builds the engine from a validated scenario.
fn build_engine(cfg: &ScenarioConfig) -> SimResult<Engine> {
    let schedules = cfg.schedules()?;
    let inlet = cfg.inlet()?;
    let components: Vec<Box<dyn Component>> = vec![Box::new(HeatSink::new(cfg.heat_sink.clone()))];
    Engine::new(cfg.sim_config(), schedules, inlet, components)
}

/// Runs the simulation and returns the step results and KPI.
fn run_simulation(cfg: &ScenarioConfig) -> SimResult<(Vec<StepResult>, KpiReport)> {
    let mut engine = build_engine(cfg)?;
    let results = engine.run()?;
    let kpi = KpiReport::from_results(&results, engine.config().dt_hours());
    Ok((results, kpi))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Load config: --scenario takes priority, then --preset, then uniform default
    let loaded = match (&args.scenario, &args.preset) {
        (Some(path), _) => ScenarioConfig::from_toml_file(path),
        (None, Some(name)) => ScenarioConfig::from_preset(name),
        (None, None) => Ok(ScenarioConfig::uniform()),
    };
    let mut scenario = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    if let Some(steps) = args.steps {
        scenario.simulation.steps = steps;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("{e}");
        }
        process::exit(1);
    }

    let (results, kpi) = match run_simulation(&scenario) {
        Ok(out) => out,
        Err(e) => {
            error!("simulation failed: {e}");
            process::exit(1);
        }
    };

    if args.verbose_steps {
        for r in &results {
            println!("{r}");
        }
    }

    println!("{kpi}");

    if let Some(ref path) = args.telemetry_out {
        if let Err(e) = export_csv(&results, path) {
            error!("failed to write CSV: {e}");
            process::exit(1);
        }
    }
}
