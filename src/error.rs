//! Error taxonomy shared by schedules, reporting, and components.

use std::fmt;

use thiserror::Error;

/// Which of the two dispatch schedules an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleKind {
    /// Operating-mode (turbine fraction) schedule.
    Operating,
    /// Pricing (price multiplier) schedule.
    Pricing,
}

impl fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operating => write!(f, "operating"),
            Self::Pricing => write!(f, "pricing"),
        }
    }
}

/// Error category, stable across the `Schedule` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Shape,
    Range,
    Size,
    TableShape,
    Config,
    TimeOrder,
}

/// Configuration-time failures. None of these are transient.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error(
        "TOU schedules require 12 rows and 24 columns; the {matrix} schedule has {actual} {dimension}"
    )]
    Shape {
        matrix: &'static str,
        dimension: &'static str,
        actual: usize,
    },
    #[error("{0}")]
    Range(String),
    #[error("TOU schedule contains period {max_period}, while the {array} array contains {len} elements")]
    Size {
        array: String,
        max_period: u32,
        len: usize,
    },
    #[error(
        "the user defined HTF table must contain at least 3 rows and exactly 7 columns; it contains {rows} row(s) and {cols} column(s)"
    )]
    TableShape { rows: usize, cols: usize },
    #[error("parameter `{field}` {message}")]
    Config { field: String, message: String },
    #[error("interval [{start}, {end}] is out of order (previous interval ended at {previous_end})")]
    TimeOrder {
        start: f64,
        end: f64,
        previous_end: f64,
    },
    #[error("the {kind} {source}")]
    Schedule {
        kind: ScheduleKind,
        source: Box<SimError>,
    },
}

impl SimError {
    /// Returns the error category, looking through schedule tags.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Shape { .. } => ErrorKind::Shape,
            Self::Range(_) => ErrorKind::Range,
            Self::Size { .. } => ErrorKind::Size,
            Self::TableShape { .. } => ErrorKind::TableShape,
            Self::Config { .. } => ErrorKind::Config,
            Self::TimeOrder { .. } => ErrorKind::TimeOrder,
            Self::Schedule { source, .. } => source.kind(),
        }
    }

    pub(crate) fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn tagged(self, kind: ScheduleKind) -> Self {
        Self::Schedule {
            kind,
            source: Box::new(self),
        }
    }
}

/// Convenience alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_looks_through_schedule_tag() {
        let err = SimError::Range("smallest TOU period cannot be less than 1".into())
            .tagged(ScheduleKind::Pricing);
        assert_eq!(err.kind(), ErrorKind::Range);
        assert!(err.to_string().starts_with("the pricing "));
    }

    #[test]
    fn shape_message_names_matrix_and_count() {
        let err = SimError::Shape {
            matrix: "weekday",
            dimension: "rows",
            actual: 11,
        };
        let msg = err.to_string();
        assert!(msg.contains("weekday"));
        assert!(msg.contains("11 rows"));
    }
}
