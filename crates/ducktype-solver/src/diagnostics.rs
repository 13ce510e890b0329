//! Conformance violations and the tracer that collects them.
//!
//! A violation is data, not control flow: the member checker reports each
//! mismatch to a `ConformanceTracer` and the tracer decides whether the
//! traversal keeps going.
//!
//! - **FastTracer**: stops at the first violation without building it. Used
//!   for boolean "does it conform?" queries.
//! - **ViolationCollector**: builds and keeps every violation in detection
//!   order. Used when the caller needs the full report.

use serde::Serialize;
use std::fmt;

/// Stable tag for each kind of mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    MethodMissing,
    VisibilityMismatch,
    TooManyParameters,
    ParameterMissing,
    ParameterTypeMissing,
    ParameterTypeMismatch,
    ReturnTypeMissing,
    ReturnTypeMismatch,
    PropertyMissing,
    PropertyVisibilityMismatch,
    PropertyTypeMissing,
    PropertyTypeMismatch,
}

impl ViolationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ViolationKind::MethodMissing => "method_missing",
            ViolationKind::VisibilityMismatch => "visibility_mismatch",
            ViolationKind::TooManyParameters => "too_many_parameters",
            ViolationKind::ParameterMissing => "parameter_missing",
            ViolationKind::ParameterTypeMissing => "parameter_type_missing",
            ViolationKind::ParameterTypeMismatch => "parameter_type_mismatch",
            ViolationKind::ReturnTypeMissing => "return_type_missing",
            ViolationKind::ReturnTypeMismatch => "return_type_mismatch",
            ViolationKind::PropertyMissing => "property_missing",
            ViolationKind::PropertyVisibilityMismatch => "property_visibility_mismatch",
            ViolationKind::PropertyTypeMissing => "property_type_missing",
            ViolationKind::PropertyTypeMismatch => "property_type_mismatch",
        }
    }

    pub fn is_property(self) -> bool {
        matches!(
            self,
            ViolationKind::PropertyMissing
                | ViolationKind::PropertyVisibilityMismatch
                | ViolationKind::PropertyTypeMissing
                | ViolationKind::PropertyTypeMismatch
        )
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected structural mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ConformanceViolation {
    pub kind: ViolationKind,
    /// Name of the contract member the mismatch belongs to.
    pub member: String,
    /// Human-readable explanation.
    pub detail: String,
}

impl ConformanceViolation {
    pub fn new(kind: ViolationKind, member: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            member: member.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ConformanceViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.detail)
    }
}

// =============================================================================
// Tracer Pattern
// =============================================================================

/// Receives violations as the member checker finds them.
pub trait ConformanceTracer {
    /// Called once per detected mismatch. `violation` is only invoked if the
    /// tracer keeps it.
    ///
    /// Returns `true` to continue the traversal, `false` to stop it.
    fn on_violation(&mut self, violation: impl FnOnce() -> ConformanceViolation) -> bool;
}

/// Stops at the first violation.
#[derive(Clone, Copy, Debug, Default)]
pub struct FastTracer {
    failed: bool,
}

impl FastTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failed(&self) -> bool {
        self.failed
    }
}

impl ConformanceTracer for FastTracer {
    #[inline(always)]
    fn on_violation(&mut self, _violation: impl FnOnce() -> ConformanceViolation) -> bool {
        self.failed = true;
        false
    }
}

/// Collects every violation in detection order.
#[derive(Debug, Default)]
pub struct ViolationCollector {
    violations: Vec<ConformanceViolation>,
}

impl ViolationCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn violations(&self) -> &[ConformanceViolation] {
        &self.violations
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn into_violations(self) -> Vec<ConformanceViolation> {
        self.violations
    }
}

impl ConformanceTracer for ViolationCollector {
    #[inline]
    fn on_violation(&mut self, violation: impl FnOnce() -> ConformanceViolation) -> bool {
        self.violations.push(violation());
        true
    }
}
