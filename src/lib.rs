//! # csv-query-engine
//!
//! Loads a CSV file into memory and runs a small relational pipeline over it.
//! Every step takes the current dataset plus an expression string and returns
//! a brand-new dataset; nothing is mutated in place. Supported steps:
//!
//! - **filter**: `column>=value`, `<=`, `>`, `<`, `=`
//! - **distinct**: first row per distinct value of a column
//! - **order_by**: `column=asc|desc`
//! - **limit_offset**: paging over the current rows
//! - **aggregate**: `column=avg|min|max` (terminal)
//!
//! Cells are kept as raw strings. Comparisons, sorting and aggregation coerce
//! them to numbers on demand with [`coerce_number`]; filters fall back to
//! string comparison when either side is not numeric.
//!
//! # Example
//!
//! ```rust
//! use csv_query_engine::{Number, QueryEngine, Table};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let table = Table::new(
//!         vec!["brand".into(), "price".into()],
//!         vec![
//!             vec!["xiaomi".into(), "199".into()],
//!             vec!["apple".into(), "999".into()],
//!             vec!["xiaomi".into(), "299".into()],
//!         ],
//!     )?;
//!     let engine = QueryEngine::new(table);
//!
//!     // Filter rows
//!     let xiaomi = engine.filter("brand=xiaomi")?;
//!     assert_eq!(xiaomi.row_count(), 2);
//!
//!     // Aggregate numeric column
//!     let avg = xiaomi.aggregate("price=avg")?;
//!     assert_eq!(avg.get("avg"), Some(Number::Float(249.0)));
//!
//!     // Deduplicate, then page
//!     let brands = engine.distinct("brand")?.limit_offset(Some(1), 1)?;
//!     assert_eq!(brands.rows()[0].get("brand"), Some("apple"));
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
mod helpers;
pub mod io;
pub mod processor;

pub use helpers::number::{Number, coerce_number};
pub use io::loader::{LoadError, load_csv};
pub use processor::{
    AggregateFunction, AggregateResult, QueryError,
    query_engine::QueryEngine,
    table::{Row, Table},
};
