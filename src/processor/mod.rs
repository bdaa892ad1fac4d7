use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::helpers::number::Number;

pub mod expression;
pub mod query_engine;
pub mod table;

/// Error type used across the query pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("Malformed {clause} expression: `{expr}`")]
    MalformedExpression { clause: &'static str, expr: String },

    #[error("Column `{0}` not found")]
    ColumnNotFound(String),

    #[error("Value `{0}` is not a number")]
    NotANumber(String),

    #[error("No rows to aggregate")]
    EmptyDataset,

    #[error("Unknown aggregate function: {0}")]
    UnknownAggregateFunction(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Row {row} has {found} fields, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Aggregate functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunction {
    /// Arithmetic mean, always a float
    Avg,
    /// Minimum value
    Min,
    /// Maximum value
    Max,
}

impl AggregateFunction {
    pub fn name(self) -> &'static str {
        match self {
            AggregateFunction::Avg => "avg",
            AggregateFunction::Min => "min",
            AggregateFunction::Max => "max",
        }
    }
}

impl FromStr for AggregateFunction {
    type Err = QueryError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "avg" => Ok(AggregateFunction::Avg),
            "min" => Ok(AggregateFunction::Min),
            "max" => Ok(AggregateFunction::Max),
            other => Err(QueryError::UnknownAggregateFunction(other.to_string())),
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of an aggregation: a single `function name -> value` entry.
///
/// Terminal; nothing chains off it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateResult {
    pub function: AggregateFunction,
    pub value: Number,
}

impl AggregateResult {
    /// Looks up the value by function name, e.g. `result.get("min")`.
    pub fn get(&self, name: &str) -> Option<Number> {
        (self.function.name() == name).then_some(self.value)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&'static str, Number)> + '_ {
        std::iter::once((self.function.name(), self.value))
    }
}
