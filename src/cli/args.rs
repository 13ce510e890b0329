use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the ducktype binary.
#[derive(Parser, Debug)]
#[command(
    name = "ducktype",
    version,
    about = "Structural conformance checks for declared classes and interfaces"
)]
pub struct CliArgs {
    /// Path to the JSON manifest of types and checks.
    #[arg(short = 'm', long, default_value = "ducktype.json")]
    pub manifest: PathBuf,

    /// Run a single check of this candidate instead of the manifest checks.
    #[arg(long, requires = "contract")]
    pub candidate: Option<String>,

    /// Contract type for the single check given with --candidate.
    #[arg(long, requires = "candidate")]
    pub contract: Option<String>,

    /// Report format.
    #[arg(short = 'f', long, value_enum, ignore_case = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Disable colored text output.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Accept `any` candidate parameters against any contract parameter type.
    #[arg(long = "widen-any")]
    pub widen_any: bool,
}

impl CliArgs {
    /// The ad-hoc check requested on the command line, if any.
    pub fn single_check(&self) -> Option<(&str, &str)> {
        match (&self.candidate, &self.contract) {
            (Some(candidate), Some(contract)) => Some((candidate, contract)),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
