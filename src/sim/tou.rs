//! Time-of-use dispatch facade over the operating and pricing block schedules.

use tracing::{info, trace};

use super::calendar;
use super::schedule::{BlockSchedule, ScheduleDefinition};
use crate::error::{ScheduleKind, SimError, SimResult};

/// Label of the operating schedule's value array.
pub const TURBINE_FRACTION: &str = "Turbine Fraction";
/// Label of the pricing schedule's value array.
pub const PRICE_MULTIPLIER: &str = "Price Multiplier";

const SECONDS_PER_HOUR: f64 = 3600.0;
/// Absorbs rounding when the elapsed time lands on an hour boundary.
const HOUR_BOUNDARY_TOLERANCE: f64 = 1.0e-6;

/// Active periods and their values for one timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouOutputs {
    /// 1-based operating period id.
    pub operating_period: u32,
    /// 1-based pricing period id.
    pub pricing_period: u32,
    /// Operating (turbine) fraction for the operating period.
    pub turbine_fraction: f64,
    /// Price multiplier for the pricing period.
    pub price_multiplier: f64,
}

/// Operating and pricing schedules expanded for one year.
///
/// Immutable after construction, so lookups can be shared across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct TouSchedules {
    operating: BlockSchedule,
    pricing: BlockSchedule,
    leap_year: bool,
}

impl TouSchedules {
    /// Validates and expands both schedules.
    ///
    /// # Errors
    ///
    /// Returns the first failure wrapped in [`SimError::Schedule`] tagged with
    /// the schedule it came from. Operating is checked first.
    pub fn init(
        operating: ScheduleDefinition,
        pricing: ScheduleDefinition,
        leap_year: bool,
    ) -> SimResult<Self> {
        let operating = BlockSchedule::init(operating, TURBINE_FRACTION, leap_year)
            .map_err(|e| e.tagged(ScheduleKind::Operating))?;
        let pricing = BlockSchedule::init(pricing, PRICE_MULTIPLIER, leap_year)
            .map_err(|e| e.tagged(ScheduleKind::Pricing))?;

        info!(
            hours = operating.hourly().len(),
            leap_year, "initialized TOU schedules"
        );
        Ok(Self {
            operating,
            pricing,
            leap_year,
        })
    }

    /// Both schedules as a single period with value 1.0.
    pub fn uniform(leap_year: bool) -> Self {
        Self {
            operating: BlockSchedule::uniform(TURBINE_FRACTION, leap_year),
            pricing: BlockSchedule::uniform(PRICE_MULTIPLIER, leap_year),
            leap_year,
        }
    }

    /// Rebuilds both schedules for a different year type.
    ///
    /// # Errors
    ///
    /// Same as [`TouSchedules::init`].
    pub fn with_leap_year(&self, leap_year: bool) -> SimResult<Self> {
        let operating = self
            .operating
            .rebuild(leap_year)
            .map_err(|e| e.tagged(ScheduleKind::Operating))?;
        let pricing = self
            .pricing
            .rebuild(leap_year)
            .map_err(|e| e.tagged(ScheduleKind::Pricing))?;
        Ok(Self {
            operating,
            pricing,
            leap_year,
        })
    }

    /// Resolves the periods active at `elapsed_s` seconds since the start of the year.
    ///
    /// `elapsed_s` is the end of the timestep, so `(0, 3600]` maps to hour 0.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Range`] if the hour falls outside the year.
    pub fn lookup(&self, elapsed_s: f64) -> SimResult<TouOutputs> {
        let hour = hour_index(elapsed_s)
            .filter(|&h| h < self.total_hours())
            .ok_or_else(|| {
                SimError::Range(format!(
                    "the hour input to the TOU schedule must be from 1 to {}; elapsed time {elapsed_s} s is outside the year",
                    self.total_hours()
                ))
            })?;

        let (operating_period, turbine_fraction) = resolve(&self.operating, hour)?;
        let (pricing_period, price_multiplier) = resolve(&self.pricing, hour)?;
        trace!(hour, operating_period, pricing_period, "TOU lookup");

        Ok(TouOutputs {
            operating_period,
            pricing_period,
            turbine_fraction,
            price_multiplier,
        })
    }

    /// Hours in the configured year.
    pub fn total_hours(&self) -> usize {
        calendar::hours_in_year(self.leap_year)
    }

    pub fn is_leap_year(&self) -> bool {
        self.leap_year
    }

    pub fn operating(&self) -> &BlockSchedule {
        &self.operating
    }

    pub fn pricing(&self) -> &BlockSchedule {
        &self.pricing
    }
}

/// Zero-based hour whose interval `(h, h + 1]` contains `elapsed_s`, or `None` before the year.
fn hour_index(elapsed_s: f64) -> Option<usize> {
    let hour = (elapsed_s / SECONDS_PER_HOUR - HOUR_BOUNDARY_TOLERANCE).ceil() - 1.0;
    if hour.is_finite() && hour >= 0.0 {
        Some(hour as usize)
    } else {
        None
    }
}

fn resolve(schedule: &BlockSchedule, hour: usize) -> SimResult<(u32, f64)> {
    let period = schedule
        .period_at(hour)
        .ok_or_else(|| SimError::Range(format!("hour {hour} is not in the expanded schedule")))?;
    let value = schedule.value(0, period).ok_or_else(|| {
        SimError::Range(format!("period {period} has no value in the schedule table"))
    })?;
    Ok((period, value))
}
