//! ducktype: structural conformance checks driven by a JSON manifest.
//!
//! The checking itself lives in `ducktype-solver`; this crate adds the
//! manifest format, the command-line driver and tracing setup.

pub use ducktype_solver as solver;
pub use ducktype_solver::{
    CheckError, CheckPolicy, ConformanceViolation, StructuralChecker, TypeDecl, TypeRegistry,
    ViolationKind,
};

pub mod cli;
pub mod tracing_config;
