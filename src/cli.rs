use std::path::PathBuf;

use clap::Parser;

/// Annual TOU dispatch simulation of a heat sink.
///
/// If neither `--scenario` nor `--preset` is given, the uniform preset is used.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Load the scenario from a TOML file.
    #[clap(long, conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Use a built-in preset (uniform, summer_peak).
    #[clap(long)]
    pub preset: Option<String>,

    /// Override the number of timesteps to run.
    #[clap(long)]
    pub steps: Option<usize>,

    /// Export step results to CSV.
    #[clap(long = "telemetry-out")]
    pub telemetry_out: Option<PathBuf>,

    /// Print one line per timestep.
    #[clap(long)]
    pub verbose_steps: bool,
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;

    #[test]
    fn supports_scenario_cli() {
        let args = Args::try_parse_from(["tou-sim", "--scenario", "scenario.toml"]).unwrap();
        assert_eq!(
            args.scenario.as_deref().and_then(|p| p.to_str()),
            Some("scenario.toml")
        );
        assert!(args.preset.is_none());
    }

    #[test]
    fn supports_preset_and_steps() {
        let args =
            Args::try_parse_from(["tou-sim", "--preset", "summer_peak", "--steps", "48"]).unwrap();
        assert_eq!(args.preset.as_deref(), Some("summer_peak"));
        assert_eq!(args.steps, Some(48));
        assert!(args.scenario.is_none());
    }

    #[test]
    fn scenario_and_preset_are_exclusive() {
        let result =
            Args::try_parse_from(["tou-sim", "--scenario", "a.toml", "--preset", "uniform"]);
        assert!(result.is_err());
    }

    #[test]
    fn telemetry_out_flag() {
        let args = Args::try_parse_from(["tou-sim", "--telemetry-out", "out.csv"]).unwrap();
        assert_eq!(
            args.telemetry_out.as_deref().and_then(|p| p.to_str()),
            Some("out.csv")
        );
    }
}
