//! Structural compatibility checker.
//!
//! Entry point of the solver. Given a candidate and a contract type name it:
//! 1. resolves the contract name, failing fast if it is unknown
//! 2. fetches both descriptors through the `DescriptorCache`
//! 3. runs member conformance over every contract method, then every
//!    contract property
//!
//! Usage errors (`CheckError::UnknownContractType`, ...) are returned before
//! any member is compared and never appear among the violations.

use crate::caches::{DescriptorCache, query_trace};
use crate::conformance::MemberConformance;
use crate::diagnostics::{ConformanceTracer, ConformanceViolation, FastTracer, ViolationCollector};
use crate::policy::CheckPolicy;
use crate::reflect::{ReflectError, Reflector};
use crate::types::TypeDescriptor;
use crate::variance::VarianceEvaluator;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Anything that names a type: a type name, or a descriptor of its own.
///
/// Candidates may carry their own descriptor (an anonymous type the reflector
/// does not know about). Contracts are always resolved by name.
pub trait TypeKey {
    fn type_name(&self) -> &str;

    fn inline_descriptor(&self) -> Option<&TypeDescriptor> {
        None
    }
}

impl TypeKey for str {
    fn type_name(&self) -> &str {
        self
    }
}

impl TypeKey for String {
    fn type_name(&self) -> &str {
        self
    }
}

impl TypeKey for TypeDescriptor {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn inline_descriptor(&self) -> Option<&TypeDescriptor> {
        Some(self)
    }
}

impl<T: TypeKey + ?Sized> TypeKey for &T {
    fn type_name(&self) -> &str {
        (**self).type_name()
    }

    fn inline_descriptor(&self) -> Option<&TypeDescriptor> {
        (**self).inline_descriptor()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// The contract name is neither a class nor an interface.
    UnknownContractType { name: String },
    /// The candidate's runtime type cannot be resolved.
    UnknownCandidateType { name: String },
    /// The reflector failed while building a descriptor.
    Reflection(ReflectError),
    /// The candidate does not conform; `violations` is never empty.
    Nonconforming {
        candidate: String,
        contract: String,
        violations: Vec<ConformanceViolation>,
    },
}

impl CheckError {
    /// The violations of a nonconforming check, empty for usage errors.
    pub fn violations(&self) -> &[ConformanceViolation] {
        match self {
            CheckError::Nonconforming { violations, .. } => violations,
            _ => &[],
        }
    }

    pub fn is_usage_error(&self) -> bool {
        !matches!(self, CheckError::Nonconforming { .. })
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckError::UnknownContractType { name } => write!(f, "Type {name} does not exist."),
            CheckError::UnknownCandidateType { name } => {
                write!(f, "Candidate type {name} does not exist.")
            }
            CheckError::Reflection(err) => fmt::Display::fmt(err, f),
            CheckError::Nonconforming {
                candidate,
                contract,
                violations,
            } => {
                write!(
                    f,
                    "Duck typing assertion failed: {candidate} does not conform to {contract}:"
                )?;
                for violation in violations {
                    write!(f, "\n{}", violation.detail)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for CheckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CheckError::Reflection(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ReflectError> for CheckError {
    fn from(err: ReflectError) -> Self {
        CheckError::Reflection(err)
    }
}

/// Checks candidates against contracts using one reflector and one cache.
///
/// Cheap to share across threads: all state lives behind `&self`.
pub struct StructuralChecker<R: Reflector> {
    reflector: R,
    cache: Arc<DescriptorCache>,
    policy: CheckPolicy,
}

impl<R: Reflector> StructuralChecker<R> {
    pub fn new(reflector: R) -> Self {
        Self::with_cache(reflector, Arc::new(DescriptorCache::new()))
    }

    /// Use an existing cache, e.g. one shared with other checkers over the
    /// same reflector.
    pub fn with_cache(reflector: R, cache: Arc<DescriptorCache>) -> Self {
        Self {
            reflector,
            cache,
            policy: CheckPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: CheckPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn reflector(&self) -> &R {
        &self.reflector
    }

    pub fn cache(&self) -> &Arc<DescriptorCache> {
        &self.cache
    }

    pub fn policy(&self) -> CheckPolicy {
        self.policy
    }

    /// Cached descriptor of a resolvable type name.
    pub fn descriptor(&self, name: &str) -> Result<Arc<TypeDescriptor>, ReflectError> {
        self.cache
            .get_or_try_insert_with(name, || self.reflector.reflect(name))
    }

    /// Every violation of `candidate` against `contract`, in detection order.
    pub fn collect_violations<C, K>(
        &self,
        candidate: &C,
        contract: &K,
    ) -> Result<Vec<ConformanceViolation>, CheckError>
    where
        C: TypeKey + ?Sized,
        K: TypeKey + ?Sized,
    {
        let query_id = query_trace::enabled().then(query_trace::next_query_id);
        if let Some(query_id) = query_id {
            query_trace::check_start(
                query_id,
                "collect_violations",
                candidate.type_name(),
                contract.type_name(),
            );
        }

        let mut collector = ViolationCollector::new();
        self.run(candidate, contract, &mut collector)?;
        let violations = collector.into_violations();

        if let Some(query_id) = query_id {
            query_trace::check_end(
                query_id,
                "collect_violations",
                violations.len(),
                violations.is_empty(),
            );
        }
        debug!(
            candidate = candidate.type_name(),
            contract = contract.type_name(),
            violations = violations.len(),
            "structural check finished"
        );
        Ok(violations)
    }

    /// `Ok(())` if `candidate` conforms to `contract`, otherwise the usage
    /// error or the full list of violations.
    pub fn check<C, K>(&self, candidate: &C, contract: &K) -> Result<(), CheckError>
    where
        C: TypeKey + ?Sized,
        K: TypeKey + ?Sized,
    {
        let violations = self.collect_violations(candidate, contract)?;
        if violations.is_empty() {
            return Ok(());
        }
        Err(CheckError::Nonconforming {
            candidate: candidate.type_name().to_string(),
            contract: contract.type_name().to_string(),
            violations,
        })
    }

    /// Boolean conformance. Stops at the first violation.
    pub fn conforms<C, K>(&self, candidate: &C, contract: &K) -> Result<bool, CheckError>
    where
        C: TypeKey + ?Sized,
        K: TypeKey + ?Sized,
    {
        let mut tracer = FastTracer::new();
        self.run(candidate, contract, &mut tracer)?;
        Ok(!tracer.failed())
    }

    fn run<C, K, T>(&self, candidate: &C, contract: &K, tracer: &mut T) -> Result<(), CheckError>
    where
        C: TypeKey + ?Sized,
        K: TypeKey + ?Sized,
        T: ConformanceTracer,
    {
        let contract_name = contract.type_name();
        if self.reflector.type_kind(contract_name).is_none() {
            return Err(CheckError::UnknownContractType {
                name: contract_name.to_string(),
            });
        }
        let contract_descriptor = self.descriptor(contract_name)?;

        let reflected;
        let candidate_descriptor: &TypeDescriptor = match candidate.inline_descriptor() {
            Some(inline) => inline,
            None => {
                let name = candidate.type_name();
                if self.reflector.type_kind(name).is_none() {
                    return Err(CheckError::UnknownCandidateType {
                        name: name.to_string(),
                    });
                }
                reflected = self.descriptor(name)?;
                &reflected
            }
        };

        trace!(
            candidate = %candidate_descriptor.type_name,
            contract = contract_name,
            members = contract_descriptor.member_count(),
            "comparing members"
        );

        let variance = VarianceEvaluator::new(&self.reflector).with_policy(self.policy);
        let members = MemberConformance::new(variance);

        for method in contract_descriptor.methods() {
            if !members.check_method(method, candidate_descriptor, tracer) {
                return Ok(());
            }
        }
        for property in contract_descriptor.properties() {
            if !members.check_property(property, candidate_descriptor, tracer) {
                return Ok(());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/checker_tests.rs"]
mod tests;
