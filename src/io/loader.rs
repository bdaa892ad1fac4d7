use std::{fs::File, path::Path};

use memchr::memchr_iter;
use memmap2::Mmap;
use thiserror::Error;
use tracing::{debug, info};

use crate::processor::{QueryError, table::Table};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Line {line}: expected {expected} fields, got {found}")]
    RaggedRecord {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Table(#[from] QueryError),
}

/// Loads a CSV file into a [`Table`] using memory mapping
///
/// The first record names the columns; every following record must have the
/// same number of fields. Blank lines are skipped, quoted fields may contain
/// delimiters and newlines.
///
/// # Errors
/// Returns a [`LoadError`] if:
/// - File cannot be opened or mapped
/// - A record is not valid CSV / UTF-8
/// - A record's width differs from the header
pub fn load_csv(path: &Path) -> Result<Table, LoadError> {
    let file = File::open(path)?;

    // mapping a zero-length file fails on some platforms
    if file.metadata()?.len() == 0 {
        info!(path = %path.display(), "empty CSV file");
        return parse_csv(&[]);
    }

    let mmap = unsafe { Mmap::map(&file)? };
    let table = parse_csv(&mmap[..])?;

    info!(
        path = %path.display(),
        columns = table.headers().len(),
        rows = table.row_count(),
        "loaded CSV"
    );
    Ok(table)
}

/// Parses CSV bytes already in memory. A leading UTF-8 BOM is dropped.
pub fn parse_csv(buf: &[u8]) -> Result<Table, LoadError> {
    let buf = buf.strip_prefix(UTF8_BOM).unwrap_or(buf);
    let estimated_rows = memchr_iter(b'\n', buf).count();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(buf);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    debug!(?headers, estimated_rows, "parsed CSV header");

    let mut records = Vec::with_capacity(estimated_rows);
    for result in reader.records() {
        let record = result?;
        if record.len() != headers.len() {
            return Err(LoadError::RaggedRecord {
                line: record.position().map_or(0, |p| p.line()),
                expected: headers.len(),
                found: record.len(),
            });
        }
        records.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table::new(headers, records)?)
}
