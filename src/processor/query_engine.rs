use std::{cmp::Ordering, collections::HashSet, path::Path};

use tracing::debug;

use crate::{
    helpers::number::{Number, coerce_number},
    io::loader::{LoadError, load_csv},
    processor::{
        AggregateFunction, AggregateResult, QueryError,
        expression::{AggregateSpec, Condition, SortDirection, SortSpec},
        table::{Row, Table},
    },
};

/// Immutable dataset wrapper; every operation returns a new engine.
///
/// # Examples
///
/// ```rust
/// # use csv_query_engine::{QueryEngine, Table, Number};
/// let table = Table::new(
///     vec!["brand".into(), "price".into()],
///     vec![
///         vec!["apple".into(), "999".into()],
///         vec!["nokia".into(), "59".into()],
///         vec!["oneplus".into(), "699".into()],
///     ],
/// )?;
/// let engine = QueryEngine::new(table);
///
/// let pricey = engine.filter("price>500")?.order_by("price=desc")?;
/// assert_eq!(pricey.rows()[0].get("brand"), Some("apple"));
///
/// let max = engine.aggregate("price=max")?;
/// assert_eq!(max.get("max"), Some(Number::Int(999)));
/// # Ok::<(), csv_query_engine::QueryError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QueryEngine {
    table: Table,
}

impl QueryEngine {
    pub fn new(table: Table) -> Self {
        QueryEngine { table }
    }

    /// Loads a CSV file; see [`load_csv`].
    pub fn from_csv(path: &Path) -> Result<Self, LoadError> {
        load_csv(path).map(QueryEngine::new)
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn headers(&self) -> &[String] {
        self.table.headers()
    }

    pub fn rows(&self) -> &[Row] {
        self.table.rows()
    }

    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }

    fn derive(&self, rows: Vec<Row>) -> QueryEngine {
        QueryEngine::new(self.table.derive(rows))
    }

    /// Keeps the rows satisfying `column<op>literal`.
    ///
    /// Operators are `>=`, `<=`, `>`, `<`, `=`. When both the cell and the
    /// literal coerce to numbers they compare numerically; otherwise the raw
    /// cell is compared with the literal as a string.
    ///
    /// # Errors
    /// - [`QueryError::MalformedExpression`] if no operator is present
    /// - [`QueryError::ColumnNotFound`] if a row has no such column
    pub fn filter(&self, expr: &str) -> Result<QueryEngine, QueryError> {
        let cond = Condition::parse(expr)?;
        let literal_num = coerce_number(&cond.literal).ok();

        let mut kept = Vec::new();
        for row in self.rows() {
            let value = row
                .get(&cond.column)
                .ok_or_else(|| QueryError::ColumnNotFound(cond.column.clone()))?;

            let ordering = match (coerce_number(value).ok(), literal_num) {
                (Some(lhs), Some(rhs)) => lhs.compare(&rhs),
                _ => value.cmp(cond.literal.as_str()),
            };

            if cond.op.holds(ordering) {
                kept.push(row.clone());
            }
        }

        debug!(
            expr,
            rows_in = self.row_count(),
            rows_out = kept.len(),
            "filter"
        );
        Ok(self.derive(kept))
    }

    /// Sorts by `column=asc|desc`.
    ///
    /// Cells that coerce sort as numbers, the rest as strings, and every
    /// number sorts before every string. Both directions are stable: rows with
    /// equal keys keep their input order. Unknown directions mean ascending.
    ///
    /// # Errors
    /// - [`QueryError::MalformedExpression`] if there is no `=`
    /// - [`QueryError::ColumnNotFound`] if the column is not a header
    pub fn order_by(&self, expr: &str) -> Result<QueryEngine, QueryError> {
        let spec = SortSpec::parse(expr)?;
        let idx = self
            .table
            .column_index(&spec.column)
            .ok_or_else(|| QueryError::ColumnNotFound(spec.column.clone()))?;

        let mut keyed: Vec<(SortKey<'_>, &Row)> = self
            .rows()
            .iter()
            .map(|row| (SortKey::of(&row.values()[idx]), row))
            .collect();

        match spec.direction {
            SortDirection::Ascending => keyed.sort_by(|(a, _), (b, _)| a.cmp(b)),
            SortDirection::Descending => keyed.sort_by(|(a, _), (b, _)| b.cmp(a)),
        }

        debug!(column = %spec.column, direction = ?spec.direction, "order_by");
        Ok(self.derive(keyed.into_iter().map(|(_, row)| row.clone()).collect()))
    }

    /// Keeps the first row for every distinct raw value of `column`.
    ///
    /// # Errors
    /// [`QueryError::ColumnNotFound`] if the column is not a header.
    pub fn distinct(&self, column: &str) -> Result<QueryEngine, QueryError> {
        let values = self.table.column_values(column)?;

        let mut seen = HashSet::with_capacity(values.len());
        let unique: Vec<Row> = self
            .rows()
            .iter()
            .zip(values)
            .filter(|(_, value)| seen.insert(*value))
            .map(|(row, _)| row.clone())
            .collect();

        debug!(
            column,
            rows_in = self.row_count(),
            rows_out = unique.len(),
            "distinct"
        );
        Ok(self.derive(unique))
    }

    /// Skips `offset` rows, then keeps at most `limit` (all when `None`).
    ///
    /// An offset past the end yields an empty result.
    ///
    /// # Errors
    /// [`QueryError::InvalidArgument`] if `limit` or `offset` is negative.
    pub fn limit_offset(
        &self,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<QueryEngine, QueryError> {
        let offset = usize::try_from(offset).map_err(|_| {
            QueryError::InvalidArgument(format!("offset must be >= 0, got {offset}"))
        })?;
        let limit = limit
            .map(|l| {
                usize::try_from(l).map_err(|_| {
                    QueryError::InvalidArgument(format!("limit must be >= 0, got {l}"))
                })
            })
            .transpose()?;

        let len = self.row_count();
        let start = offset.min(len);
        let end = match limit {
            Some(l) => start.saturating_add(l).min(len),
            None => len,
        };

        debug!(?limit, offset, rows_out = end - start, "limit_offset");
        Ok(self.derive(self.rows()[start..end].to_vec()))
    }

    /// Aggregates `column=avg|min|max` over a fully numeric column.
    ///
    /// `avg` is always a float; `min`/`max` return the selected input value,
    /// so an all-integer column yields an integer.
    ///
    /// # Errors
    /// Checked in this order:
    /// - [`QueryError::MalformedExpression`] if there is no `=`
    /// - [`QueryError::ColumnNotFound`] / [`QueryError::NotANumber`] per row
    /// - [`QueryError::EmptyDataset`] when there are no rows
    /// - [`QueryError::UnknownAggregateFunction`]
    pub fn aggregate(&self, expr: &str) -> Result<AggregateResult, QueryError> {
        let spec = AggregateSpec::parse(expr)?;

        let values = self
            .rows()
            .iter()
            .map(|row| {
                row.get(&spec.column)
                    .ok_or_else(|| QueryError::ColumnNotFound(spec.column.clone()))
                    .and_then(coerce_number)
            })
            .collect::<Result<Vec<Number>, QueryError>>()?;

        if values.is_empty() {
            return Err(QueryError::EmptyDataset);
        }

        let function: AggregateFunction = spec.function.parse()?;
        let value = match function {
            AggregateFunction::Avg => {
                let sum: f64 = values.iter().map(|v| v.as_f64()).sum();
                Number::Float(sum / values.len() as f64)
            }
            AggregateFunction::Min => select(&values, Ordering::Less),
            AggregateFunction::Max => select(&values, Ordering::Greater),
        };

        debug!(column = %spec.column, %function, %value, "aggregate");
        Ok(AggregateResult { function, value })
    }
}

/// First value that no later value beats in direction `wins`.
fn select(values: &[Number], wins: Ordering) -> Number {
    values[1..].iter().fold(values[0], |best, v| {
        if v.compare(&best) == wins { *v } else { best }
    })
}

/// Per-row sort key; numbers order before text.
#[derive(Debug, Clone, Copy)]
enum SortKey<'a> {
    Numeric(Number),
    Text(&'a str),
}

impl<'a> SortKey<'a> {
    fn of(raw: &'a str) -> Self {
        match coerce_number(raw) {
            Ok(n) => SortKey::Numeric(n),
            Err(_) => SortKey::Text(raw),
        }
    }
}

impl Ord for SortKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Numeric(a), SortKey::Numeric(b)) => a.compare(b),
            (SortKey::Numeric(_), SortKey::Text(_)) => Ordering::Less,
            (SortKey::Text(_), SortKey::Numeric(_)) => Ordering::Greater,
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for SortKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// `Int(1)` and `Float(1.0)` are the same key
impl PartialEq for SortKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey<'_> {}
