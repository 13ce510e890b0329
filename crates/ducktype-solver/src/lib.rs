//! Structural Conformance Solver
//!
//! Decides whether a candidate type satisfies a contract type by shape alone:
//! every method and property the contract declares must exist on the
//! candidate with compatible visibility, arity and types. Nominal
//! relationships are only consulted when comparing two named types.
//!
//! Type compatibility follows the usual variance rules:
//!
//! - **Parameters**: contravariant (the candidate may accept more)
//! - **Return types**: covariant (the candidate may return less)
//! - **Properties**: invariant (exact match, nullability included)
//!
//! Union types are decomposed before the named-type rules apply; a union on
//! the candidate side must cover (parameters) or fit inside (returns) the
//! contract side.
//!
//! The entry point is [`StructuralChecker`]. Type information comes from a
//! [`Reflector`]; [`TypeRegistry`] is the in-memory implementation.
mod caches;
pub mod checker;
mod conformance;
pub mod diagnostics;
pub mod hierarchy;
pub mod policy;
pub mod reflect;
pub mod registry;
pub mod types;
pub mod variance;

pub use caches::{CACHE_TARGET, CacheStats, DescriptorCache, QUERY_TARGET};
pub use checker::{CheckError, StructuralChecker, TypeKey};
pub use conformance::MemberConformance;
pub use diagnostics::{
    ConformanceTracer, ConformanceViolation, FastTracer, ViolationCollector, ViolationKind,
};
pub use hierarchy::{FlatHierarchy, InheritanceGraph, NominalHierarchy};
pub use policy::CheckPolicy;
pub use reflect::{ReflectError, Reflector};
pub use registry::{RegistryError, TypeDecl, TypeRegistry};
pub use types::{
    MethodDescriptor, NamedType, ParameterDescriptor, PropertyDescriptor, TypeDescriptor,
    TypeKind, TypeRef, TypeRefParseError, UnionType, Visibility,
};
pub use variance::{VarianceEvaluator, accepts_as_parameter, accepts_as_return, is_invariant_match};
