use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::{
    io::render::{render_aggregate, render_table},
    processor::query_engine::QueryEngine,
};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "csvq",
    version,
    about = "CSV processor: filter, aggregate, order, page and deduplicate rows",
    after_help = "Steps run in a fixed order: \
      where, distinct, order-by, limit/offset, aggregate.\n\n\
      Examples:\n  \
      csvq -f phones.csv -w \"price>500\" --order-by \"price=desc\"\n  \
      csvq -f phones.csv --distinct brand --limit 3\n  \
      csvq -f phones.csv -w \"brand=xiaomi\" -a \"rating=avg\""
)]
pub struct Cli {
    /// Path to the CSV file
    #[arg(short, long)]
    pub file: PathBuf,

    /// Filter condition, e.g. "price>500"
    #[arg(short, long = "where", value_name = "column>value")]
    pub where_clause: Option<String>,

    /// Aggregate a numeric column: avg|min|max
    #[arg(short, long, value_name = "column=agg")]
    pub aggregate: Option<String>,

    /// Sort the result, e.g. price=desc
    #[arg(long, value_name = "column=asc|desc")]
    pub order_by: Option<String>,

    /// Maximum number of rows to output
    #[arg(long, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Number of rows to skip before output
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub offset: i64,

    /// Keep the first row for each distinct value of this column
    #[arg(long, value_name = "column")]
    pub distinct: Option<String>,

    /// Log filter directives (tracing EnvFilter syntax)
    #[arg(long, env = "CSVQ_LOG", default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    fn pages(&self) -> bool {
        self.offset != 0 || self.limit.is_some()
    }
}

/// Runs the pipeline described by `cli` and returns the rendered table.
pub fn run(cli: &Cli) -> Result<String> {
    let mut engine = QueryEngine::from_csv(&cli.file)
        .with_context(|| format!("failed to load {}", cli.file.display()))?;

    if let Some(expr) = &cli.where_clause {
        engine = engine.filter(expr)?;
    }

    if let Some(column) = &cli.distinct {
        engine = engine.distinct(column)?;
    }

    if let Some(expr) = &cli.order_by {
        engine = engine.order_by(expr)?;
    }

    if cli.pages() {
        engine = engine.limit_offset(cli.limit, cli.offset)?;
    }

    if let Some(expr) = &cli.aggregate {
        let result = engine.aggregate(expr)?;
        info!(function = %result.function, value = %result.value, "aggregate computed");
        return Ok(render_aggregate(&result));
    }

    info!(rows = engine.row_count(), "pipeline finished");
    Ok(render_table(engine.table()))
}
