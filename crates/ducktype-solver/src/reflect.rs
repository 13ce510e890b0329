//! Reflection collaborator.
//!
//! The checker never inspects types itself. It asks a `Reflector` whether a
//! name resolves and for the normalized descriptor of that name.

use crate::hierarchy::NominalHierarchy;
use crate::types::{TypeDescriptor, TypeKind};
use std::fmt;
use std::sync::Arc;

/// Turns type names into descriptors.
///
/// `reflect` must be deterministic for a given name during a run: results
/// are cached and never rebuilt.
pub trait Reflector: NominalHierarchy + Send + Sync {
    /// What `name` denotes, or `None` if it is neither a class nor an interface.
    fn type_kind(&self, name: &str) -> Option<TypeKind>;

    /// Build the descriptor of `name`, including inherited members.
    fn reflect(&self, name: &str) -> Result<TypeDescriptor, ReflectError>;
}

impl<T: Reflector + ?Sized> Reflector for &T {
    fn type_kind(&self, name: &str) -> Option<TypeKind> {
        (**self).type_kind(name)
    }

    fn reflect(&self, name: &str) -> Result<TypeDescriptor, ReflectError> {
        (**self).reflect(name)
    }
}

impl<T: Reflector + ?Sized> Reflector for Arc<T> {
    fn type_kind(&self, name: &str) -> Option<TypeKind> {
        (**self).type_kind(name)
    }

    fn reflect(&self, name: &str) -> Result<TypeDescriptor, ReflectError> {
        (**self).reflect(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReflectError {
    /// The name is not a known class or interface.
    UnknownType { name: String },
    /// `type_name` derives from `parent`, which is not known.
    UnknownParent { type_name: String, parent: String },
}

impl fmt::Display for ReflectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReflectError::UnknownType { name } => write!(f, "Type {name} does not exist."),
            ReflectError::UnknownParent { type_name, parent } => {
                write!(f, "Type {type_name} derives from unknown type {parent}.")
            }
        }
    }
}

impl std::error::Error for ReflectError {}
