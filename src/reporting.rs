//! Per-timestep output aggregation.
//!
//! A component may be evaluated several times before a timestep is accepted.
//! Each evaluation records its instantaneous outputs here; closing the interval
//! reduces those samples to one committed value per quantity.

use std::marker::PhantomData;

use crate::error::{SimError, SimResult};

/// Slack allowed between one interval's end and the next one's start.
const TIME_ORDER_TOLERANCE_S: f64 = 1.0e-6;

/// How the samples of one interval collapse into its reported value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// Σ(value × duration) / Σduration.
    TimeWeightedAverage,
    /// The first sample of the interval.
    First,
    /// The most recent sample of the interval.
    Last,
}

/// A reported output of a component.
///
/// Implemented by small `Copy` enums; `ALL` lists every quantity in index order.
pub trait Quantity: Copy + 'static {
    const ALL: &'static [Self];

    /// Position of this quantity in `ALL`.
    fn index(self) -> usize;

    /// Identifier used in exports.
    fn label(self) -> &'static str;

    fn aggregation(self) -> Aggregation;
}

#[derive(Debug, Clone, Default)]
struct Accumulator {
    weighted_sum: f64,
    duration: f64,
    first: Option<f64>,
    last: Option<f64>,
}

impl Accumulator {
    fn push(&mut self, value: f64, duration: f64) {
        let duration = duration.max(0.0);
        self.weighted_sum += value * duration;
        self.duration += duration;
        self.first.get_or_insert(value);
        self.last = Some(value);
    }

    fn reduce(&self, aggregation: Aggregation) -> Option<f64> {
        let last = self.last?;
        let value = match aggregation {
            Aggregation::TimeWeightedAverage if self.duration > 0.0 => {
                self.weighted_sum / self.duration
            }
            Aggregation::TimeWeightedAverage | Aggregation::Last => last,
            Aggregation::First => self.first.unwrap_or(last),
        };
        Some(value)
    }
}

#[derive(Debug, Clone)]
struct Series {
    label: &'static str,
    aggregation: Aggregation,
    open: Accumulator,
    committed: Vec<f64>,
}

/// Open-interval accumulators and committed series for every quantity `Q`.
#[derive(Debug, Clone)]
pub struct ReportedOutputs<Q: Quantity> {
    series: Vec<Series>,
    last_end: Option<f64>,
    _quantity: PhantomData<Q>,
}

impl<Q: Quantity> Default for ReportedOutputs<Q> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q: Quantity> ReportedOutputs<Q> {
    pub fn new() -> Self {
        let series = Q::ALL
            .iter()
            .map(|q| Series {
                label: q.label(),
                aggregation: q.aggregation(),
                open: Accumulator::default(),
                committed: Vec::new(),
            })
            .collect();
        Self {
            series,
            last_end: None,
            _quantity: PhantomData,
        }
    }

    /// Adds a sample of `quantity` lasting `duration` seconds to the open interval.
    pub fn record(&mut self, quantity: Q, value: f64, duration: f64) {
        if let Some(series) = self.series.get_mut(quantity.index()) {
            series.open.push(value, duration);
        }
    }

    /// Commits one value per quantity for `[start, end]` and opens a new interval.
    ///
    /// A quantity with no samples repeats its last committed value (0.0 if it
    /// has none); for a zero-length interval it commits 0.0 instead.
    ///
    /// Samples are reduced by their own durations, not by `end - start`, so a
    /// zero-length interval holding several samples commits their
    /// duration-weighted mean, or the last sample when every duration is 0.
    ///
    /// # Errors
    ///
    /// [`SimError::TimeOrder`] if `end < start` or the interval starts before
    /// the previous one ended. Nothing is committed in that case.
    pub fn close_interval(&mut self, start: f64, end: f64) -> SimResult<()> {
        let previous_end = self.last_end.unwrap_or(f64::NEG_INFINITY);
        if end < start || start + TIME_ORDER_TOLERANCE_S < previous_end {
            return Err(SimError::TimeOrder {
                start,
                end,
                previous_end,
            });
        }

        let empty_interval = end <= start;
        for series in &mut self.series {
            let value = series.open.reduce(series.aggregation).unwrap_or_else(|| {
                if empty_interval {
                    0.0
                } else {
                    series.committed.last().copied().unwrap_or(0.0)
                }
            });
            series.committed.push(value);
            series.open = Accumulator::default();
        }
        self.last_end = Some(end);
        Ok(())
    }

    /// Committed values of `quantity`, one per closed interval.
    pub fn series(&self, quantity: Q) -> &[f64] {
        self.series
            .get(quantity.index())
            .map_or(&[], |s| s.committed.as_slice())
    }

    /// Copies the committed series of quantity `index` into `destination`.
    ///
    /// Writes at most `destination.len()` values and returns how many were
    /// written. An unknown `index` writes nothing.
    pub fn export(&self, index: usize, destination: &mut [f64]) -> usize {
        let Some(series) = self.series.get(index) else {
            return 0;
        };
        let n = series.committed.len().min(destination.len());
        destination[..n].copy_from_slice(&series.committed[..n]);
        n
    }

    /// Label of quantity `index`.
    pub fn label(&self, index: usize) -> Option<&'static str> {
        self.series.get(index).map(|s| s.label)
    }

    /// Number of closed intervals.
    pub fn n_intervals(&self) -> usize {
        self.series.first().map_or(0, |s| s.committed.len())
    }
}
