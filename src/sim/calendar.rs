//! Expansion of 12×24 weekday/weekend block matrices into an annual hourly array.

use crate::error::{SimError, SimResult};

/// Rows of a block matrix (one per month).
pub const MONTHS: usize = 12;
/// Columns of a block matrix (one per hour of day).
pub const HOURS_PER_DAY: usize = 24;
/// Hours in a non-leap year.
pub const HOURS_PER_YEAR: usize = 8760;

const DAYS_IN_MONTH: [usize; MONTHS] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
const MONTH_HOUR_LIMIT: usize = MONTHS * HOURS_PER_DAY;
const FIRST_WEEKDAY_CURSOR: i32 = 5;

/// Number of hours in the simulated year.
pub fn hours_in_year(leap_year: bool) -> usize {
    HOURS_PER_YEAR + if leap_year { HOURS_PER_DAY } else { 0 }
}

/// A month × hour matrix of 1-based period ids with a verified 12×24 shape.
///
/// Cells are kept signed so that out-of-range ids survive until the value
/// table check reports them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMatrix([[i32; HOURS_PER_DAY]; MONTHS]);

impl BlockMatrix {
    /// Builds a matrix with every cell set to `period`.
    pub fn filled(period: i32) -> Self {
        Self([[period; HOURS_PER_DAY]; MONTHS])
    }

    /// Checks the shape of `rows` and copies it into a fixed matrix.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Shape`] naming `matrix` if there are not exactly 12
    /// rows or any row does not have exactly 24 columns.
    pub fn from_rows(matrix: &'static str, rows: &[Vec<i32>]) -> SimResult<Self> {
        if rows.len() != MONTHS {
            return Err(SimError::Shape {
                matrix,
                dimension: "rows",
                actual: rows.len(),
            });
        }
        if let Some(bad) = rows.iter().find(|row| row.len() != HOURS_PER_DAY) {
            return Err(SimError::Shape {
                matrix,
                dimension: "columns",
                actual: bad.len(),
            });
        }

        let mut cells = [[0; HOURS_PER_DAY]; MONTHS];
        for (dst, src) in cells.iter_mut().zip(rows) {
            dst.copy_from_slice(src);
        }
        Ok(Self(cells))
    }

    /// Period id at `(month, hour)`, both zero-based.
    pub fn get(&self, month: usize, hour: usize) -> i32 {
        self.0[month][hour]
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.iter().flatten().copied()
    }
}

/// Expands the weekday/weekend matrices into one period id per hour of the year.
///
/// Day classification follows a cursor that starts at 5 and counts down once
/// per day; a day is a weekend when the cursor is at or below zero, and after
/// reaching -1 it resets to 5. January 1 is therefore a weekday and days 6 and
/// 7 of every seven-day cycle are the weekend.
///
/// Cells must already be validated as positive ids.
pub fn expand(weekdays: &BlockMatrix, weekends: &BlockMatrix, leap_year: bool) -> Vec<u32> {
    let total = hours_in_year(leap_year);
    let mut days = DAYS_IN_MONTH;
    if leap_year {
        days[1] += 1;
    }

    let mut hourly = Vec::with_capacity(total);
    let mut cursor = FIRST_WEEKDAY_CURSOR;
    for (month, &n_days) in days.iter().enumerate() {
        for _ in 0..n_days {
            let weekend = cursor <= 0;
            if cursor >= 0 {
                cursor -= 1;
            } else {
                cursor = FIRST_WEEKDAY_CURSOR;
            }

            let source = if weekend { weekends } else { weekdays };
            for hour in 0..HOURS_PER_DAY {
                if hourly.len() >= total || month * HOURS_PER_DAY + hour >= MONTH_HOUR_LIMIT {
                    break;
                }
                hourly.push(source.get(month, hour).unsigned_abs());
            }
        }
    }

    debug_assert_eq!(hourly.len(), total);
    hourly
}

/// Whether day-of-year `day` (zero-based) is classified as a weekend.
pub fn is_weekend_day(day: usize) -> bool {
    day % 7 >= 5
}
