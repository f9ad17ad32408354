//! CSV export for simulation step results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use crate::sim::types::StepResult;

/// Column header for CSV telemetry export.
const HEADER: &str = "timestep,time_hr,operating_period,pricing_period,\
                       turbine_fraction,price_multiplier,inlet_temp_c,\
                       m_dot_kg_per_hr,q_dot_mwt,w_dot_pump_mwe,success";

/// Exports simulation results to a CSV file at the given path.
///
/// Writes a header row followed by one data row per step. Produces
/// deterministic output for identical inputs.
///
/// # Arguments
///
/// * `results` - Complete simulation step results
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(results: &[StepResult], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(results, buf)?;
    info!(rows = results.len(), path = %path.display(), "telemetry exported");
    Ok(())
}

/// Writes simulation results as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(results: &[StepResult], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in results {
        wtr.write_record(&[
            r.timestep.to_string(),
            format!("{:.4}", r.time_hr),
            r.operating_period.to_string(),
            r.pricing_period.to_string(),
            format!("{:.4}", r.turbine_fraction),
            format!("{:.4}", r.price_multiplier),
            format!("{:.2}", r.inlet_temp_c),
            format!("{:.3}", r.m_dot_kg_per_hr),
            format!("{:.6}", r.q_dot_mwt),
            format!("{:.6}", r.w_dot_pump_mwe),
            r.success.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
