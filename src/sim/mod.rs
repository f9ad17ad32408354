/// Month/weekday calendar expansion.
pub mod calendar;
/// Simulation clock for timestep management.
pub mod clock;
pub mod engine;
pub mod kpi;
/// Block schedules and their period-value tables.
pub mod schedule;
/// Operating and pricing schedule lookup.
pub mod tou;
pub mod types;
