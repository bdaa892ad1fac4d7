use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::Rng;

const BRANDS: [&str; 6] = ["apple", "samsung", "xiaomi", "oneplus", "nokia", "google"];
const MODELS: [&str; 5] = ["Lite", "Pro", "Ultra", "Mini", "Max"];

/// Writes a synthetic `name,brand,price,rating` CSV.
#[derive(Parser, Debug)]
#[command(name = "data_generator", about = "Generate a sample phones CSV")]
struct Args {
    /// Output CSV path
    #[arg(default_value = "data/phones.csv")]
    path: PathBuf,

    /// Number of data rows
    #[arg(default_value_t = 100_000)]
    rows: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let file = File::create(&args.path)
        .with_context(|| format!("cannot create {}", args.path.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "name,brand,price,rating")?;

    let mut rng = rand::rng();
    for i in 0..args.rows {
        let brand = BRANDS[rng.random_range(0..BRANDS.len())];
        let model = MODELS[rng.random_range(0..MODELS.len())];
        let price = rng.random_range(0..1500);
        let rating = rng.random_range(0..=50) as f64 / 10.0;
        writeln!(writer, "{brand} {model} {i},{brand},{price},{rating:.1}")?;
    }
    writer.flush()?;

    println!(
        "Sample CSV generated: {} ({} rows)",
        args.path.display(),
        args.rows
    );
    Ok(())
}
