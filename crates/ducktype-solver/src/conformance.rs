//! Member-level conformance.
//!
//! Compares one contract member against the candidate descriptor. Checks run
//! in a fixed order and each mismatch is reported to the tracer:
//!
//! - methods: presence, visibility, parameter count, each parameter, return type
//! - properties: presence, visibility, declared type
//!
//! A missing member, too many parameters, or a missing declared type ends the
//! checks for that member (or that parameter) only.

use crate::diagnostics::{ConformanceTracer, ConformanceViolation, ViolationKind};
use crate::types::{MethodDescriptor, PropertyDescriptor, TypeDescriptor};
use crate::variance::{VarianceEvaluator, is_invariant_match};

pub struct MemberConformance<'a> {
    variance: VarianceEvaluator<'a>,
}

impl<'a> MemberConformance<'a> {
    pub fn new(variance: VarianceEvaluator<'a>) -> Self {
        Self { variance }
    }

    /// Check `contract` against the method of the same name in `candidate`.
    ///
    /// Returns `false` if the tracer asked to stop the traversal.
    pub fn check_method<T: ConformanceTracer>(
        &self,
        contract: &MethodDescriptor,
        candidate: &TypeDescriptor,
        tracer: &mut T,
    ) -> bool {
        let method = contract.name.as_str();

        let Some(found) = candidate.method(method) else {
            return report(tracer, ViolationKind::MethodMissing, method, || {
                format!("Method {method} not found in instance.")
            });
        };

        if found.visibility != contract.visibility
            && !report(tracer, ViolationKind::VisibilityMismatch, method, || {
                format!("Method {method} should be {}.", contract.visibility)
            })
        {
            return false;
        }

        if found.parameters.len() > contract.parameters.len() {
            return report(tracer, ViolationKind::TooManyParameters, method, || {
                format!(
                    "Method {method} has more parameters than expected ({} > {}).",
                    found.parameters.len(),
                    contract.parameters.len()
                )
            });
        }

        for (index, expected) in contract.parameters.iter().enumerate() {
            let param = expected.name.as_str();

            let Some(actual) = found.parameters.get(index) else {
                if !report(tracer, ViolationKind::ParameterMissing, method, || {
                    format!("Parameter {param} in method {method} is missing.")
                }) {
                    return false;
                }
                continue;
            };

            let Some(expected_type) = &expected.declared_type else {
                continue;
            };

            let Some(actual_type) = &actual.declared_type else {
                if !report(tracer, ViolationKind::ParameterTypeMissing, method, || {
                    format!("Parameter {param} in method {method} is missing type declaration.")
                }) {
                    return false;
                }
                continue;
            };

            if !self
                .variance
                .accepts_as_parameter(expected_type, actual_type)
                && !report(tracer, ViolationKind::ParameterTypeMismatch, method, || {
                    format!(
                        "Parameter {param} in method {method} has type mismatch \
                         (expected {expected_type}, found {actual_type})."
                    )
                })
            {
                return false;
            }
        }

        let Some(expected_return) = &contract.return_type else {
            return true;
        };
        match &found.return_type {
            None => report(tracer, ViolationKind::ReturnTypeMissing, method, || {
                format!("Method {method} is missing return type.")
            }),
            Some(actual_return) if !self.variance.accepts_as_return(expected_return, actual_return) => {
                report(tracer, ViolationKind::ReturnTypeMismatch, method, || {
                    format!(
                        "Return type of method {method} does not match \
                         (expected {expected_return}, found {actual_return})."
                    )
                })
            }
            Some(_) => true,
        }
    }

    /// Check `contract` against the property of the same name in `candidate`.
    ///
    /// Property types are invariant: a property can be read and written, so
    /// neither widening nor narrowing is safe.
    pub fn check_property<T: ConformanceTracer>(
        &self,
        contract: &PropertyDescriptor,
        candidate: &TypeDescriptor,
        tracer: &mut T,
    ) -> bool {
        let property = contract.name.as_str();

        let Some(found) = candidate.property(property) else {
            return report(tracer, ViolationKind::PropertyMissing, property, || {
                format!("Property {property} not found in instance.")
            });
        };

        if found.visibility != contract.visibility
            && !report(tracer, ViolationKind::PropertyVisibilityMismatch, property, || {
                format!("Property {property} should be {}.", contract.visibility)
            })
        {
            return false;
        }

        let Some(expected_type) = &contract.declared_type else {
            return true;
        };
        match &found.declared_type {
            None => report(tracer, ViolationKind::PropertyTypeMissing, property, || {
                format!("Property {property} is missing type declaration.")
            }),
            Some(actual_type) if !is_invariant_match(expected_type, actual_type) => {
                report(tracer, ViolationKind::PropertyTypeMismatch, property, || {
                    format!(
                        "Property {property} has a type mismatch \
                         (expected {expected_type}, found {actual_type})."
                    )
                })
            }
            Some(_) => true,
        }
    }
}

#[inline]
fn report<T: ConformanceTracer>(
    tracer: &mut T,
    kind: ViolationKind,
    member: &str,
    detail: impl FnOnce() -> String,
) -> bool {
    tracer.on_violation(|| ConformanceViolation::new(kind, member, detail()))
}

#[cfg(test)]
#[path = "../tests/conformance_tests.rs"]
mod tests;
