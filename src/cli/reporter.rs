use anyhow::{Context, Result};
use colored::Colorize;

use crate::cli::driver::{CheckOutcome, CheckStatus, RunResult};
use ducktype_solver::ViolationKind;

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    /// Human-readable report: one block per check, then a summary line.
    pub fn render(&self, result: &RunResult) -> String {
        let mut out = String::new();
        for outcome in &result.checks {
            out.push_str(&self.format_outcome(outcome));
            out.push('\n');
        }
        out.push_str(&self.format_summary(result));
        out
    }

    pub fn format_outcome(&self, outcome: &CheckOutcome) -> String {
        let pair = format!("{} -> {}", outcome.candidate, outcome.contract);
        match &outcome.status {
            CheckStatus::Conforms => format!("{} {pair}", self.label("ok", Tone::Good)),
            CheckStatus::Nonconforming { violations } => {
                let properties = violations.iter().filter(|v| v.kind.is_property()).count();
                let methods = violations.len() - properties;
                let mut output = format!(
                    "{} {pair} ({})",
                    self.label("FAIL", Tone::Bad),
                    tally(methods, properties)
                );
                for violation in violations {
                    output.push_str("\n  ");
                    output.push_str(&self.paint_kind(violation.kind));
                    output.push_str(": ");
                    output.push_str(&violation.detail);
                }
                output
            }
            CheckStatus::Error { message } => {
                format!("{} {pair}: {message}", self.label("error", Tone::Warn))
            }
        }
    }

    fn format_summary(&self, result: &RunResult) -> String {
        let total = result.checks.len();
        let summary = format!(
            "{total} check{}: {} conforming, {} nonconforming, {} error{}",
            if total == 1 { "" } else { "s" },
            result.conforming(),
            result.nonconforming(),
            result.errors(),
            if result.errors() == 1 { "" } else { "s" },
        );
        if self.color {
            summary.bold().to_string()
        } else {
            summary
        }
    }

    fn label(&self, text: &str, tone: Tone) -> String {
        if !self.color {
            return text.to_string();
        }
        match tone {
            Tone::Good => text.green().bold().to_string(),
            Tone::Bad => text.red().bold().to_string(),
            Tone::Warn => text.yellow().bold().to_string(),
        }
    }

    fn paint_kind(&self, kind: ViolationKind) -> String {
        let text = kind.as_str();
        match (self.color, kind.is_property()) {
            (false, _) => text.to_string(),
            (true, false) => text.cyan().to_string(),
            (true, true) => text.magenta().to_string(),
        }
    }
}

/// `2 method mismatches, 1 property mismatch`, skipping empty groups.
fn tally(methods: usize, properties: usize) -> String {
    let group = |count: usize, what: &str| {
        format!("{count} {what} mismatch{}", if count == 1 { "" } else { "es" })
    };
    match (methods, properties) {
        (0, p) => group(p, "property"),
        (m, 0) => group(m, "method"),
        (m, p) => format!("{}, {}", group(m, "method"), group(p, "property")),
    }
}

#[derive(Clone, Copy)]
enum Tone {
    Good,
    Bad,
    Warn,
}

/// Pretty-printed JSON report.
pub fn render_json(result: &RunResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize report")
}
