use anyhow::Result;
use ducktype_solver::{CheckError, ConformanceViolation, Reflector, StructuralChecker};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::cli::args::CliArgs;
use crate::cli::manifest::{CheckEntry, load_manifest};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_NONCONFORMING: i32 = 1;
pub const EXIT_USAGE_ERROR: i32 = 2;

/// Result of one candidate/contract check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub candidate: String,
    pub contract: String,
    #[serde(flatten)]
    pub status: CheckStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckStatus {
    Conforms,
    Nonconforming {
        violations: Vec<ConformanceViolation>,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Default, Serialize)]
pub struct RunResult {
    pub checks: Vec<CheckOutcome>,
}

impl RunResult {
    pub fn conforming(&self) -> usize {
        self.count(|status| matches!(status, CheckStatus::Conforms))
    }

    pub fn nonconforming(&self) -> usize {
        self.count(|status| matches!(status, CheckStatus::Nonconforming { .. }))
    }

    pub fn errors(&self) -> usize {
        self.count(|status| matches!(status, CheckStatus::Error { .. }))
    }

    /// Usage errors outrank nonconformance.
    pub fn exit_code(&self) -> i32 {
        if self.errors() > 0 {
            EXIT_USAGE_ERROR
        } else if self.nonconforming() > 0 {
            EXIT_NONCONFORMING
        } else {
            EXIT_SUCCESS
        }
    }

    fn count(&self, pred: impl Fn(&CheckStatus) -> bool) -> usize {
        self.checks.iter().filter(|check| pred(&check.status)).count()
    }
}

/// Load the manifest, declare its types and run the requested checks.
///
/// Manifest problems (unreadable file, bad JSON, invalid declarations) are
/// returned as errors; problems with individual checks become
/// `CheckStatus::Error` outcomes.
pub fn run(args: &CliArgs, cwd: &Path) -> Result<RunResult> {
    let manifest_path = resolve_path(cwd, &args.manifest);
    let manifest = load_manifest(&manifest_path)?;
    let registry = manifest.build_registry()?;

    let mut policy = manifest.policy();
    if args.widen_any {
        policy = policy.with_widen_any_parameters(true);
    }
    let checker = StructuralChecker::new(registry).with_policy(policy);

    let checks = match args.single_check() {
        Some((candidate, contract)) => vec![CheckEntry {
            candidate: candidate.to_string(),
            contract: contract.to_string(),
        }],
        None => manifest.checks,
    };
    info!(
        manifest = %manifest_path.display(),
        types = manifest.types.len(),
        checks = checks.len(),
        "running conformance checks"
    );

    Ok(check_all(&checker, &checks))
}

/// Run `checks` in parallel; outcomes keep the order of `checks`.
pub fn check_all<R: Reflector>(
    checker: &StructuralChecker<R>,
    checks: &[CheckEntry],
) -> RunResult {
    let checks = checks
        .par_iter()
        .map(|entry| check_one(checker, entry))
        .collect();
    RunResult { checks }
}

fn check_one<R: Reflector>(checker: &StructuralChecker<R>, entry: &CheckEntry) -> CheckOutcome {
    let status = match checker.check(entry.candidate.as_str(), entry.contract.as_str()) {
        Ok(()) => CheckStatus::Conforms,
        Err(CheckError::Nonconforming { violations, .. }) => {
            CheckStatus::Nonconforming { violations }
        }
        Err(err) => CheckStatus::Error {
            message: err.to_string(),
        },
    };
    debug!(
        candidate = %entry.candidate,
        contract = %entry.contract,
        ?status,
        "check finished"
    );
    CheckOutcome {
        candidate: entry.candidate.clone(),
        contract: entry.contract.clone(),
        status,
    }
}

fn resolve_path(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
