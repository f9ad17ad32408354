//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use tou_sim::components::heat_sink::{HeatSink, HeatSinkParams};
use tou_sim::components::types::Component;
use tou_sim::sim::schedule::ScheduleDefinition;
use tou_sim::sim::types::InletCondition;

/// 12×24 matrix filled with one period id.
pub fn filled(period: i32) -> Vec<Vec<i32>> {
    vec![vec![period; 24]; 12]
}

/// Weekdays in period 1, weekends in period 2, with the given values.
pub fn weekday_weekend(values: Vec<f64>) -> ScheduleDefinition {
    ScheduleDefinition {
        weekdays: filled(1),
        weekends: filled(2),
        values,
    }
}

/// Reference heat sink parameters (300/250 C, 10 MWt, 0.5 kW/kg/s, solar salt).
pub fn reference_params() -> HeatSinkParams {
    HeatSinkParams {
        hot_temp_design: Some(300.0),
        cold_temp_design: Some(250.0),
        thermal_duty_design: Some(10.0),
        pump_power_coefficient: Some(0.5),
        fluid: None,
    }
}

/// Boxed reference heat sink, not yet initialized.
pub fn reference_sink() -> Box<dyn Component> {
    Box::new(HeatSink::new(reference_params()))
}

/// Inlet at the reference design hot temperature and full flow.
pub fn design_inlet() -> InletCondition {
    InletCondition {
        temperature_c: 300.0,
        flow_fraction: 1.0,
    }
}

/// End-of-step elapsed seconds for zero-based `hour`.
pub fn hour_end(hour: usize) -> f64 {
    (hour + 1) as f64 * 3600.0
}
