//! Variance rules for type references.
//!
//! A candidate member substitutes for a contract member when:
//!
//! - **Parameters are contravariant**: the candidate accepts at least what the
//!   contract accepts, so its declared type is equal to or a *supertype* of
//!   the contract's.
//! - **Return types are covariant**: the candidate returns at most what the
//!   contract promises, so its declared type is equal to or a *subtype* of the
//!   contract's. Nullability is invariant here.
//!
//! Unions are decomposed into their named members and each member is related
//! on its own. Scalar names only relate by equality; class and interface names
//! ask the `NominalHierarchy`.

use crate::hierarchy::NominalHierarchy;
use crate::policy::CheckPolicy;
use crate::types::{NamedType, TypeRef, is_scalar_name};

/// Relates two type references under a nominal hierarchy and a policy.
pub struct VarianceEvaluator<'a> {
    hierarchy: &'a dyn NominalHierarchy,
    policy: CheckPolicy,
}

impl<'a> VarianceEvaluator<'a> {
    pub fn new(hierarchy: &'a dyn NominalHierarchy) -> Self {
        Self {
            hierarchy,
            policy: CheckPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: CheckPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> CheckPolicy {
        self.policy
    }

    /// Contravariant check: can a method declared to accept `actual` stand in
    /// where `expected` is required?
    ///
    /// ## Unions
    /// - `expected` union: every expected member must be accepted, by at least
    ///   one member when `actual` is itself a union.
    /// - only `actual` union: some actual member must accept `expected`.
    pub fn accepts_as_parameter(&self, expected: &TypeRef, actual: &TypeRef) -> bool {
        match (expected, actual) {
            (TypeRef::Union(expected), actual) => expected
                .members()
                .iter()
                .all(|member| self.any_member_accepts_parameter(member, actual)),
            (TypeRef::Named(expected), actual) => {
                self.any_member_accepts_parameter(expected, actual)
            }
        }
    }

    /// Covariant check: can a method declared to return `actual` stand in
    /// where `expected` is promised?
    ///
    /// ## Unions
    /// - both unions: every expected member must be matched by some actual
    ///   member.
    /// - only `expected` union: `actual` must match some expected member.
    /// - only `actual` union: some actual member must match `expected`.
    pub fn accepts_as_return(&self, expected: &TypeRef, actual: &TypeRef) -> bool {
        match (expected, actual) {
            (TypeRef::Union(expected), TypeRef::Union(actual)) => {
                expected.members().iter().all(|e| {
                    actual
                        .members()
                        .iter()
                        .any(|a| self.named_accepts_return(e, a))
                })
            }
            (TypeRef::Union(expected), TypeRef::Named(actual)) => expected
                .members()
                .iter()
                .any(|e| self.named_accepts_return(e, actual)),
            (TypeRef::Named(expected), TypeRef::Union(actual)) => actual
                .members()
                .iter()
                .any(|a| self.named_accepts_return(expected, a)),
            (TypeRef::Named(expected), TypeRef::Named(actual)) => {
                self.named_accepts_return(expected, actual)
            }
        }
    }

    /// Nominal subtyping restricted to non-scalar names.
    pub fn is_nominal_subtype(&self, sub: &str, sup: &str) -> bool {
        if sub == sup {
            return true;
        }
        if is_scalar_name(sub) || is_scalar_name(sup) {
            return false;
        }
        self.hierarchy.is_nominal_subtype(sub, sup)
    }

    fn any_member_accepts_parameter(&self, expected: &NamedType, actual: &TypeRef) -> bool {
        actual
            .constituents()
            .iter()
            .any(|member| self.named_accepts_parameter(expected, member))
    }

    fn named_accepts_parameter(&self, expected: &NamedType, actual: &NamedType) -> bool {
        // `any` admits null, so it is resolved before the nullability rule.
        if expected.is_any() {
            return true;
        }
        if actual.is_any() {
            return self.policy.widen_any_parameters;
        }
        // The candidate must not admit null unless the contract does.
        if actual.nullable && !expected.nullable {
            return false;
        }
        if expected.name == actual.name {
            return true;
        }
        self.is_nominal_subtype(&expected.name, &actual.name)
    }

    fn named_accepts_return(&self, expected: &NamedType, actual: &NamedType) -> bool {
        if expected.nullable != actual.nullable {
            return false;
        }
        if expected.name == actual.name {
            return true;
        }
        self.is_nominal_subtype(&actual.name, &expected.name)
    }
}

/// Contravariant parameter check with the default policy.
pub fn accepts_as_parameter(
    expected: &TypeRef,
    actual: &TypeRef,
    hierarchy: &dyn NominalHierarchy,
) -> bool {
    VarianceEvaluator::new(hierarchy).accepts_as_parameter(expected, actual)
}

/// Covariant return check with the default policy.
pub fn accepts_as_return(
    expected: &TypeRef,
    actual: &TypeRef,
    hierarchy: &dyn NominalHierarchy,
) -> bool {
    VarianceEvaluator::new(hierarchy).accepts_as_return(expected, actual)
}

/// Invariant property check: same canonical type and same nullability.
pub fn is_invariant_match(expected: &TypeRef, actual: &TypeRef) -> bool {
    expected.base_name() == actual.base_name() && expected.allows_null() == actual.allows_null()
}

#[cfg(test)]
#[path = "../tests/variance_tests.rs"]
mod tests;
