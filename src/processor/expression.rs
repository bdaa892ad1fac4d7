//! Parsing of the small expression strings each pipeline step accepts:
//! `column<op>literal` for filters, `column=direction` for ordering and
//! `column=function` for aggregation.

use std::cmp::Ordering;

use memchr::memmem;

use crate::processor::QueryError;

/// Comparison operators accepted by `filter`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    GreaterOrEqual,
    LessOrEqual,
    GreaterThan,
    LessThan,
    Equals,
}

impl CompareOp {
    /// Scan order; two-character operators must precede their one-character prefixes.
    pub const PRECEDENCE: [CompareOp; 5] = [
        CompareOp::GreaterOrEqual,
        CompareOp::LessOrEqual,
        CompareOp::GreaterThan,
        CompareOp::LessThan,
        CompareOp::Equals,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::GreaterOrEqual => ">=",
            CompareOp::LessOrEqual => "<=",
            CompareOp::GreaterThan => ">",
            CompareOp::LessThan => "<",
            CompareOp::Equals => "=",
        }
    }

    /// Whether `lhs <op> rhs` holds, given `lhs.cmp(rhs)`.
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::GreaterOrEqual => ordering != Ordering::Less,
            CompareOp::LessOrEqual => ordering != Ordering::Greater,
            CompareOp::GreaterThan => ordering == Ordering::Greater,
            CompareOp::LessThan => ordering == Ordering::Less,
            CompareOp::Equals => ordering == Ordering::Equal,
        }
    }
}

/// Parsed `--where` condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub column: String,
    pub op: CompareOp,
    pub literal: String,
}

impl Condition {
    /// The first operator in [`CompareOp::PRECEDENCE`] found anywhere in
    /// `expr` wins; the split happens at its first occurrence.
    pub fn parse(expr: &str) -> Result<Self, QueryError> {
        for op in CompareOp::PRECEDENCE {
            if let Some((column, literal)) = split_once_at(expr, op.symbol()) {
                return Ok(Condition {
                    column: column.trim().to_string(),
                    op,
                    literal: literal.trim().to_string(),
                });
            }
        }
        Err(QueryError::MalformedExpression {
            clause: "where",
            expr: expr.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// `desc` (any case) is descending; every other word falls back to ascending.
    pub fn parse_lenient(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("desc") {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }
}

/// Parsed `--order-by` clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn parse(expr: &str) -> Result<Self, QueryError> {
        let (column, direction) = split_assignment(expr, "order-by")?;
        Ok(SortSpec {
            column: column.to_string(),
            direction: SortDirection::parse_lenient(direction),
        })
    }
}

/// Parsed `--aggregate` clause.
///
/// The function name is kept raw (trimmed, lowercased) and resolved only after
/// the column has been coerced, so a non-numeric column reports `NotANumber`
/// before an unknown function is noticed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSpec {
    pub column: String,
    pub function: String,
}

impl AggregateSpec {
    pub fn parse(expr: &str) -> Result<Self, QueryError> {
        let (column, function) = split_assignment(expr, "aggregate")?;
        Ok(AggregateSpec {
            column: column.to_string(),
            function: function.to_ascii_lowercase(),
        })
    }
}

/// Splits `column=value` at the first `=`, trimming both halves.
fn split_assignment<'a>(
    expr: &'a str,
    clause: &'static str,
) -> Result<(&'a str, &'a str), QueryError> {
    split_once_at(expr, "=")
        .map(|(lhs, rhs)| (lhs.trim(), rhs.trim()))
        .ok_or_else(|| QueryError::MalformedExpression {
            clause,
            expr: expr.to_string(),
        })
}

fn split_once_at<'a>(expr: &'a str, needle: &str) -> Option<(&'a str, &'a str)> {
    // operators are ASCII, so the match offset is always a char boundary
    memmem::find(expr.as_bytes(), needle.as_bytes())
        .map(|pos| (&expr[..pos], &expr[pos + needle.len()..]))
}
