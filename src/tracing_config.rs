//! Tracing setup for the `ducktype` binary.
//!
//! `DUCKTYPE_LOG` takes `RUST_LOG` directives plus a few shorthands:
//!
//! - a bare level (`debug`) applies to the ducktype crates only
//! - `1`/`on`/`true` means `info` for the ducktype crates
//! - `cache` enables the descriptor cache build events
//! - `queries` enables the per-check JSON query trace
//!
//! Shorthands and directives mix freely: `DUCKTYPE_LOG=debug,cache`.
//!
//! Output format is chosen with `DUCKTYPE_LOG_FORMAT`:
//!
//! - `text` (default): flat lines
//! - `tree`: indented spans and events via `tracing-tree`
//! - `json`: one flattened JSON object per event, for the query trace
//!
//! Nothing is installed unless `DUCKTYPE_LOG` or `RUST_LOG` is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

pub use ducktype_solver::{CACHE_TARGET, QUERY_TARGET};

const LOG_VAR: &str = "DUCKTYPE_LOG";
const LOG_FORMAT_VAR: &str = "DUCKTYPE_LOG_FORMAT";

/// Crates whose events a bare level turns on.
const OWN_CRATES: &[&str] = &["ducktype", "ducktype_solver"];

const LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var(LOG_FORMAT_VAR).unwrap_or_default())
    }
}

/// Rewrite a `DUCKTYPE_LOG` value into plain `EnvFilter` directives.
///
/// Unknown pieces pass through untouched, so full `RUST_LOG` syntax keeps
/// working.
pub fn expand_directives(value: &str) -> String {
    let mut directives: Vec<String> = Vec::new();
    for piece in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let lowered = piece.to_lowercase();
        match lowered.as_str() {
            "1" | "on" | "true" => push_own_crates(&mut directives, "info"),
            "cache" => directives.push(format!("{CACHE_TARGET}=debug")),
            "queries" => directives.push(format!("{QUERY_TARGET}=trace")),
            level if LEVELS.contains(&level) => push_own_crates(&mut directives, level),
            _ => directives.push(piece.to_string()),
        }
    }
    directives.join(",")
}

fn push_own_crates(directives: &mut Vec<String>, level: &str) {
    directives.extend(OWN_CRATES.iter().map(|krate| format!("{krate}={level}")));
}

/// `DUCKTYPE_LOG` wins over `RUST_LOG`.
fn build_filter() -> EnvFilter {
    match std::env::var(LOG_VAR) {
        Ok(value) => EnvFilter::builder().parse_lossy(expand_directives(&value)),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Install the global subscriber. All output goes to stderr so reports on
/// stdout stay machine-readable.
pub fn init_tracing() {
    if std::env::var_os(LOG_VAR).is_none() && std::env::var_os("RUST_LOG").is_none() {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_bracketed_fields(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            // Event fields land at the top level of each object.
            let json_layer = fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .with_span_list(false)
                .with_target(true)
                .with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            let text_layer = fmt::layer()
                .with_target(true)
                .without_time()
                .with_writer(std::io::stderr);

            Registry::default().with(filter).with(text_layer).init();
        }
    }
}

#[cfg(test)]
#[path = "tests/tracing_config_tests.rs"]
mod tests;
