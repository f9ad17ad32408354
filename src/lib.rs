//! Time-of-use dispatch schedules and a heat sink component for annual
//! energy-system simulation.

pub mod components;
pub mod config;
pub mod error;
pub mod fluids;
pub mod io;
pub mod reporting;
/// Calendar expansion, TOU schedules, engine, and KPI modules.
pub mod sim;
