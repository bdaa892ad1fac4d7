//! GitHub-flavoured pipe tables for query results.

use unicode_width::UnicodeWidthStr;

use crate::{
    helpers::number::coerce_number,
    processor::{AggregateResult, table::Table},
};

/// Extra room every header gets beyond its own width
const HEADER_PADDING: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

/// Renders a table: header line, dash separator, one line per row.
pub fn render_table(table: &Table) -> String {
    let rows: Vec<Vec<&str>> = table
        .rows()
        .iter()
        .map(|row| row.values().iter().map(String::as_str).collect())
        .collect();
    render(table.headers(), &rows)
}

/// Renders an aggregate result as a two-column `aggregate | value` table.
pub fn render_aggregate(result: &AggregateResult) -> String {
    let cells: Vec<(String, String)> = result
        .entries()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    let rows: Vec<Vec<&str>> = cells
        .iter()
        .map(|(name, value)| vec![name.as_str(), value.as_str()])
        .collect();
    render(&["aggregate".to_string(), "value".to_string()], &rows)
}

fn render(headers: &[String], rows: &[Vec<&str>]) -> String {
    let columns: Vec<(usize, Align)> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let cells = rows.iter().map(|r| r[idx]);
            let width = cells
                .clone()
                .map(UnicodeWidthStr::width)
                .fold(header.width() + HEADER_PADDING, usize::max);
            let numeric = !rows.is_empty() && cells.into_iter().all(|c| coerce_number(c).is_ok());
            (width, if numeric { Align::Right } else { Align::Left })
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, headers.iter().map(String::as_str), &columns);

    out.push('|');
    for (width, _) in &columns {
        out.push_str(&"-".repeat(width + 2));
        out.push('|');
    }
    out.push('\n');

    for row in rows {
        push_line(&mut out, row.iter().copied(), &columns);
    }
    out
}

fn push_line<'a>(
    out: &mut String,
    cells: impl Iterator<Item = &'a str>,
    columns: &[(usize, Align)],
) {
    out.push('|');
    for (cell, &(width, align)) in cells.zip(columns) {
        let fill = " ".repeat(width.saturating_sub(cell.width()));
        out.push(' ');
        match align {
            Align::Left => {
                out.push_str(cell);
                out.push_str(&fill);
            }
            Align::Right => {
                out.push_str(&fill);
                out.push_str(cell);
            }
        }
        out.push_str(" |");
    }
    out.push('\n');
}
