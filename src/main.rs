use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use csv_query_engine::cli::{Cli, run};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

#[cfg(not(target_env = "msvc"))]
use jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // logs go to stderr; stdout only carries the table
    let env = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    match run(&cli) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!(error = ?e, "pipeline failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
