//! Component models driven through the per-timestep lifecycle.

/// Reference thermal sink model.
pub mod heat_sink;
pub mod types;

pub use heat_sink::{HeatSink, HeatSinkOutput, HeatSinkParams};
pub use types::{Component, OperatingState, SolvedParams, SolverOutputs, StepInfo, TimestepInputs};
