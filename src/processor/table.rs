use std::sync::Arc;

use crate::processor::QueryError;

/// One record: raw string values keyed by the table's headers.
///
/// Headers and values are reference counted, so a row can be shared by any
/// number of derived tables without copying its cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    headers: Arc<[String]>,
    values: Arc<[String]>,
}

impl Row {
    /// Raw value for `column`, `None` if the row has no such key.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.headers
            .iter()
            .position(|h| h == column)
            .map(|idx| self.values[idx].as_str())
    }

    /// Values in header order
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.headers
            .iter()
            .zip(self.values.iter())
            .map(|(h, v)| (h.as_str(), v.as_str()))
    }
}

/// Headers plus ordered rows. Never mutated once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Arc<[String]>,
    rows: Vec<Row>,
}

impl Table {
    /// Builds a table from header names and records in header order.
    ///
    /// # Errors
    /// [`QueryError::RowWidth`] if a record's length differs from the header count.
    pub fn new(headers: Vec<String>, records: Vec<Vec<String>>) -> Result<Self, QueryError> {
        let headers: Arc<[String]> = headers.into();
        let mut rows = Vec::with_capacity(records.len());

        for (idx, record) in records.into_iter().enumerate() {
            if record.len() != headers.len() {
                return Err(QueryError::RowWidth {
                    row: idx,
                    expected: headers.len(),
                    found: record.len(),
                });
            }
            rows.push(Row {
                headers: Arc::clone(&headers),
                values: record.into(),
            });
        }

        Ok(Table { headers, rows })
    }

    /// Table sharing this table's headers with a different row sequence.
    pub(crate) fn derive(&self, rows: Vec<Row>) -> Table {
        Table {
            headers: Arc::clone(&self.headers),
            rows,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first header named `column`
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// All values of one column, in row order.
    pub fn column_values(&self, column: &str) -> Result<Vec<&str>, QueryError> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| QueryError::ColumnNotFound(column.to_string()))?;
        Ok(self.rows.iter().map(|r| r.values[idx].as_str()).collect())
    }
}
