#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{IsTerminal, Write};

use ducktype::cli::args::{CliArgs, OutputFormat};
use ducktype::cli::driver::{self, EXIT_USAGE_ERROR};
use ducktype::cli::reporter::{Reporter, render_json};

fn main() -> Result<()> {
    // Only installs a subscriber when DUCKTYPE_LOG or RUST_LOG is set.
    ducktype::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;

    let result = match driver::run(&args, &cwd) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(EXIT_USAGE_ERROR);
        }
    };

    let report = match args.format {
        OutputFormat::Json => render_json(&result)?,
        OutputFormat::Text => {
            let color = !args.no_color && std::io::stdout().is_terminal();
            Reporter::new(color).render(&result)
        }
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{report}").context("failed to write report")?;
    stdout.flush().context("failed to flush stdout")?;
    drop(stdout);

    std::process::exit(result.exit_code());
}
