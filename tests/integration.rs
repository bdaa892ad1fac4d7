use std::collections::HashSet;
use std::io::Write;
use std::process::Command;

use clap::Parser;
use csv_query_engine::{
    Number, QueryEngine, QueryError,
    cli::{Cli, run},
};
use tempfile::NamedTempFile;

const PHONES_CSV: &str = "name,brand,price,rating

iphone 15 pro,apple,999,4.9
Galaxy S23 Ultra,samsung,1199,4.8
Redmi Note 12,xiaomi,199,4.6
Poco X5 Pro,xiaomi,299,4.4
OnePlus 11,oneplus,699,4.5
Nokia 3310,nokia,59,3.5
TestPhone,test,0,0.0
";

fn write_csv(csv: &str) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().unwrap();
    write!(tmp, "{}", csv).unwrap();
    tmp
}

fn phones() -> (NamedTempFile, QueryEngine) {
    let tmp = write_csv(PHONES_CSV);
    let engine = QueryEngine::from_csv(tmp.path()).unwrap();
    (tmp, engine)
}

fn prices(engine: &QueryEngine) -> Vec<&str> {
    engine.table().column_values("price").unwrap()
}

#[test]
fn test_loaded_rows_skip_blank_line() {
    let (_tmp, engine) = phones();
    assert_eq!(engine.headers(), &["name", "brand", "price", "rating"]);
    assert_eq!(engine.row_count(), 7);
}

#[test]
fn test_filter_scenarios() {
    let (_tmp, engine) = phones();

    assert_eq!(prices(&engine.filter("price>500").unwrap()), vec!["999", "1199", "699"]);
    assert_eq!(engine.filter("price=0").unwrap().rows()[0].get("name"), Some("TestPhone"));

    let ge = engine.filter("rating>=4.8").unwrap();
    assert_eq!(ge.table().column_values("rating").unwrap(), vec!["4.9", "4.8"]);
    let le = engine.filter("rating<=3.5").unwrap();
    assert_eq!(le.table().column_values("rating").unwrap(), vec!["3.5", "0.0"]);

    assert_eq!(engine.filter("brand=xiaomi").unwrap().row_count(), 2);
    assert_eq!(engine.filter("brand=Samsung").unwrap().row_count(), 0);
}

#[test]
fn test_filter_output_is_ordered_subset() {
    let (_tmp, engine) = phones();
    let filtered = engine.filter("rating>4.5").unwrap();

    let mut cursor = engine.rows().iter();
    for row in filtered.rows() {
        assert!(cursor.any(|r| r == row), "row missing or out of order");
        let rating: f64 = row.get("rating").unwrap().parse().unwrap();
        assert!(rating > 4.5);
    }
}

#[test]
fn test_chaining_leaves_inputs_untouched() {
    let (_tmp, engine) = phones();
    let snapshot = engine.clone();

    let step = engine.filter("price<1000").unwrap();
    let sorted = step.order_by("price=desc").unwrap();
    let paged = sorted.limit_offset(Some(2), 1).unwrap();

    assert_eq!(engine, snapshot);
    assert_eq!(prices(&step), vec!["999", "199", "299", "699", "59", "0"]);
    assert_eq!(prices(&sorted), vec!["999", "699", "299", "199", "59", "0"]);
    assert_eq!(prices(&paged), vec!["699", "299"]);
}

#[test]
fn test_order_by_desc_scenario() {
    let (_tmp, engine) = phones();
    let desc = engine.order_by("price=desc").unwrap();
    assert_eq!(prices(&desc), vec!["1199", "999", "699", "299", "199", "59", "0"]);

    // without duplicate keys, reversed ascending equals descending
    let asc_engine = engine.order_by("price=asc").unwrap();
    let mut asc = prices(&asc_engine);
    asc.reverse();
    assert_eq!(asc, prices(&desc));
}

#[test]
fn test_reversed_ascending_differs_on_duplicate_keys() {
    let (_tmp, engine) = phones();
    let names = |e: &QueryEngine| -> Vec<String> {
        e.rows().iter().map(|r| r.get("name").unwrap().to_string()).collect()
    };

    let mut asc = names(&engine.order_by("brand=asc").unwrap());
    asc.reverse();
    let desc = names(&engine.order_by("brand=desc").unwrap());
    assert_ne!(asc, desc);
    // ties keep input order
    assert_eq!(&desc[..2], &["Redmi Note 12", "Poco X5 Pro"]);
}

#[test]
fn test_distinct_preserves_value_set() {
    let (_tmp, engine) = phones();
    let distinct = engine.distinct("brand").unwrap();
    let brands = distinct.table().column_values("brand").unwrap();

    let unique: HashSet<&str> = brands.iter().copied().collect();
    assert_eq!(unique.len(), brands.len());
    assert_eq!(brands, vec!["apple", "samsung", "xiaomi", "oneplus", "nokia", "test"]);
}

#[test]
fn test_limit_offset_scenarios() {
    let (_tmp, engine) = phones();
    assert_eq!(engine.limit_offset(Some(3), 0).unwrap().row_count(), 3);
    assert_eq!(engine.limit_offset(None, 5).unwrap().row_count(), 2);
    assert_eq!(engine.limit_offset(Some(2), 2).unwrap().rows(), &engine.rows()[2..4]);
}

#[test]
fn test_aggregate_scenarios() {
    let (_tmp, engine) = phones();
    assert_eq!(engine.aggregate("price=min").unwrap().get("min"), Some(Number::Int(0)));
    assert_eq!(engine.aggregate("price=max").unwrap().get("max"), Some(Number::Int(1199)));

    let avg = engine.aggregate("rating=avg").unwrap().value.as_f64();
    assert!((avg - 26.7 / 7.0).abs() < 1e-9);
}

#[test]
fn test_aggregate_on_header_only_file() {
    let tmp = write_csv("name,brand,price,rating\n");
    let engine = QueryEngine::from_csv(tmp.path()).unwrap();
    assert_eq!(engine.aggregate("price=avg").unwrap_err(), QueryError::EmptyDataset);
    assert_eq!(engine.aggregate("price=median").unwrap_err(), QueryError::EmptyDataset);
}

#[test]
fn test_invalid_expressions() {
    let (_tmp, engine) = phones();
    assert!(matches!(engine.filter("invalid"), Err(QueryError::MalformedExpression { .. })));
    assert!(matches!(engine.order_by("bad"), Err(QueryError::MalformedExpression { .. })));
    assert!(matches!(
        engine.aggregate("price=median"),
        Err(QueryError::UnknownAggregateFunction(_))
    ));
    assert!(matches!(engine.filter("nope>1"), Err(QueryError::ColumnNotFound(_))));
    assert!(matches!(engine.order_by("nope=asc"), Err(QueryError::ColumnNotFound(_))));
    assert!(matches!(engine.distinct("nope"), Err(QueryError::ColumnNotFound(_))));
}

fn cli(tmp: &NamedTempFile, args: &[&str]) -> Cli {
    let path = tmp.path().to_str().unwrap();
    let mut argv = vec!["csvq", "--file", path];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

#[test]
fn test_run_pipeline_renders_table() {
    let tmp = write_csv("name,price\na,10\nb,30\nc,20\n");
    let out = run(&cli(&tmp, &["-w", "price>10", "--order-by", "price=desc"])).unwrap();
    let expected = "\
| name   |   price |
|--------|---------|
| b      |      30 |
| c      |      20 |
";
    assert_eq!(out, expected);
}

#[test]
fn test_run_aggregate_after_paging() {
    let tmp = write_csv(PHONES_CSV);
    let args = ["--order-by", "price=asc", "--limit", "3", "-a", "price=max"];
    let out = run(&cli(&tmp, &args)).unwrap();
    assert!(out.contains("| max         |     199 |"), "{out}");
}

#[test]
fn test_run_rejects_negative_limit() {
    let tmp = write_csv(PHONES_CSV);
    let err = run(&cli(&tmp, &["--limit", "-1"])).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<QueryError>(),
        Some(QueryError::InvalidArgument(_))
    ));
}

#[test]
fn test_binary_reports_errors_on_stderr() {
    let tmp = write_csv(PHONES_CSV);
    let output = Command::new(env!("CARGO_BIN_EXE_csvq"))
        .args(["--file", tmp.path().to_str().unwrap(), "--where", "invalid"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Malformed where expression: `invalid`"), "{stderr}");
}

#[test]
fn test_binary_error_printed_once_without_ansi() {
    let tmp = write_csv(PHONES_CSV);
    let output = Command::new(env!("CARGO_BIN_EXE_csvq"))
        .args(["--file", tmp.path().to_str().unwrap(), "--where", "invalid"])
        .args(["--log-level", "info"])
        .output()
        .unwrap();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("Malformed where expression").count(), 1, "{stderr}");
    assert_eq!(stderr.lines().filter(|l| l.starts_with("Error: ")).count(), 1);
    assert!(!stderr.contains("ERROR"), "{stderr}");
    // stderr is a pipe here, so log lines carry no colour codes
    assert!(stderr.contains("INFO"), "{stderr}");
    assert!(!stderr.contains('\x1b'), "{stderr:?}");
}

#[test]
fn test_binary_prints_table() {
    let tmp = write_csv(PHONES_CSV);
    let output = Command::new(env!("CARGO_BIN_EXE_csvq"))
        .args(["-f", tmp.path().to_str().unwrap(), "--distinct", "brand", "--offset", "5"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 3);
    assert!(stdout.contains("| TestPhone "), "{stdout}");
}
