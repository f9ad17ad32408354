//! Block schedules: a weekday/weekend matrix pair, its period-value table, and
//! the expanded annual period array.

use serde::Deserialize;
use tracing::debug;

use super::calendar::{self, BlockMatrix};
use crate::error::{SimError, SimResult};

/// Raw block schedule as supplied by configuration.
///
/// Nothing is checked until [`BlockSchedule::init`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleDefinition {
    /// 12×24 weekday period ids.
    pub weekdays: Vec<Vec<i32>>,
    /// 12×24 weekend period ids.
    pub weekends: Vec<Vec<i32>>,
    /// Value per period; `values[k]` belongs to period `k + 1`.
    pub values: Vec<f64>,
}

impl ScheduleDefinition {
    /// A single-period schedule with value 1.0 everywhere.
    pub fn uniform() -> Self {
        let ones = vec![vec![1; calendar::HOURS_PER_DAY]; calendar::MONTHS];
        Self {
            weekdays: ones.clone(),
            weekends: ones,
            values: vec![1.0],
        }
    }
}

/// Named value arrays indexed by `period - 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodValueTable {
    labels: Vec<&'static str>,
    arrays: Vec<Vec<f64>>,
}

impl PeriodValueTable {
    /// Creates a table from `(label, values)` pairs.
    pub fn new(arrays: Vec<(&'static str, Vec<f64>)>) -> Self {
        let (labels, arrays) = arrays.into_iter().unzip();
        Self { labels, arrays }
    }

    /// Checks that every period used by the matrices has a value in every array.
    ///
    /// # Errors
    ///
    /// * [`SimError::Range`] if any cell is below 1.
    /// * [`SimError::Size`] naming the first array shorter than the largest period.
    pub fn validate(&self, weekdays: &BlockMatrix, weekends: &BlockMatrix) -> SimResult<()> {
        let (min, max) = weekdays
            .cells()
            .chain(weekends.cells())
            .fold((i32::MAX, i32::MIN), |(lo, hi), p| (lo.min(p), hi.max(p)));

        if min < 1 {
            return Err(SimError::Range(format!(
                "smallest TOU period cannot be less than 1, found {min}"
            )));
        }

        let max_period = max.unsigned_abs();
        for (label, array) in self.labels.iter().zip(&self.arrays) {
            if array.len() < max_period as usize {
                return Err(SimError::Size {
                    array: (*label).to_string(),
                    max_period,
                    len: array.len(),
                });
            }
        }
        Ok(())
    }

    /// Value of array `index` for `period`, if both exist.
    pub fn value(&self, index: usize, period: u32) -> Option<f64> {
        let slot = usize::try_from(period).ok()?.checked_sub(1)?;
        self.arrays.get(index)?.get(slot).copied()
    }

    /// Array labels in index order.
    pub fn labels(&self) -> &[&'static str] {
        &self.labels
    }
}

/// A validated and expanded block schedule. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSchedule {
    definition: ScheduleDefinition,
    table: PeriodValueTable,
    hourly: Vec<u32>,
    leap_year: bool,
}

impl BlockSchedule {
    /// Validates `definition` and expands it for the given year type.
    ///
    /// The value array is published under `label`. Shape is checked before
    /// anything is allocated for the annual array.
    ///
    /// # Errors
    ///
    /// [`SimError::Shape`], [`SimError::Range`], or [`SimError::Size`].
    pub fn init(
        definition: ScheduleDefinition,
        label: &'static str,
        leap_year: bool,
    ) -> SimResult<Self> {
        let weekdays = BlockMatrix::from_rows("weekday", &definition.weekdays)?;
        let weekends = BlockMatrix::from_rows("weekend", &definition.weekends)?;

        let table = PeriodValueTable::new(vec![(label, definition.values.clone())]);
        table.validate(&weekdays, &weekends)?;

        let hourly = calendar::expand(&weekdays, &weekends, leap_year);
        debug!(label, hours = hourly.len(), leap_year, "expanded block schedule");

        Ok(Self {
            definition,
            table,
            hourly,
            leap_year,
        })
    }

    /// Single-period schedule with value 1.0, identical to initializing
    /// [`ScheduleDefinition::uniform`].
    pub fn uniform(label: &'static str, leap_year: bool) -> Self {
        let ones = BlockMatrix::filled(1);
        Self {
            definition: ScheduleDefinition::uniform(),
            table: PeriodValueTable::new(vec![(label, vec![1.0])]),
            hourly: calendar::expand(&ones, &ones, leap_year),
            leap_year,
        }
    }

    /// Rebuilds the annual array for a different year type.
    ///
    /// # Errors
    ///
    /// Same as [`BlockSchedule::init`].
    pub fn rebuild(&self, leap_year: bool) -> SimResult<Self> {
        let label = self.table.labels().first().copied().unwrap_or_default();
        Self::init(self.definition.clone(), label, leap_year)
    }

    /// Period id active during zero-based `hour` of the year.
    pub fn period_at(&self, hour: usize) -> Option<u32> {
        self.hourly.get(hour).copied()
    }

    /// Value of array `index` for `period`.
    pub fn value(&self, index: usize, period: u32) -> Option<f64> {
        self.table.value(index, period)
    }

    /// The expanded hour → period array.
    pub fn hourly(&self) -> &[u32] {
        &self.hourly
    }

    pub fn table(&self) -> &PeriodValueTable {
        &self.table
    }

    pub fn leap_year(&self) -> bool {
        self.leap_year
    }
}
