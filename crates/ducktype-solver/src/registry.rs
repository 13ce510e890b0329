//! In-memory type registry.
//!
//! Holds declared classes and interfaces and answers reflection and nominal
//! subtyping queries from them.
//!
//! Responsibilities:
//! - Reject duplicate names and inheritance cycles at declaration time
//! - Flatten inherited members into the reflected descriptor
//! - Track `extends`/`implements` edges in an `InheritanceGraph`
//!
//! Members of every ancestor are inherited, private ones included. Ancestors
//! are merged depth-first in declaration order, then the type's own members;
//! a redeclared member replaces the inherited one at its original position.

use crate::hierarchy::{InheritanceGraph, NominalHierarchy};
use crate::reflect::{ReflectError, Reflector};
use crate::types::{MethodDescriptor, PropertyDescriptor, TypeDescriptor, TypeKind};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Declaration of one class or interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: String,
    pub kind: TypeKind,
    pub extends: Vec<String>,
    pub implements: Vec<String>,
    pub methods: Vec<MethodDescriptor>,
    pub properties: Vec<PropertyDescriptor>,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            extends: Vec::new(),
            implements: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends.push(parent.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.implements.push(interface.into());
        self
    }

    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    fn parents(&self) -> impl Iterator<Item = &String> {
        self.extends.iter().chain(self.implements.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    DuplicateType { name: String },
    InheritanceCycle { type_name: String, parent: String },
    MultipleClassParents { type_name: String },
    InterfaceImplements { type_name: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateType { name } => write!(f, "type {name} is already declared"),
            RegistryError::InheritanceCycle { type_name, parent } => write!(
                f,
                "type {type_name} cannot derive from {parent}: inheritance cycle"
            ),
            RegistryError::MultipleClassParents { type_name } => {
                write!(f, "class {type_name} can extend at most one class")
            }
            RegistryError::InterfaceImplements { type_name } => write!(
                f,
                "interface {type_name} cannot implement interfaces; use extends"
            ),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Declared types plus their inheritance graph.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    decls: RwLock<FxHashMap<String, Arc<TypeDecl>>>,
    graph: InheritanceGraph,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type. Parents may be declared later, but reflecting a type
    /// whose ancestors are still unknown fails.
    pub fn declare(&self, decl: TypeDecl) -> Result<(), RegistryError> {
        match decl.kind {
            TypeKind::Class if decl.extends.len() > 1 => {
                return Err(RegistryError::MultipleClassParents {
                    type_name: decl.name,
                });
            }
            TypeKind::Interface if !decl.implements.is_empty() => {
                return Err(RegistryError::InterfaceImplements {
                    type_name: decl.name,
                });
            }
            _ => {}
        }

        let mut decls = self.decls.write().unwrap_or_else(PoisonError::into_inner);
        if decls.contains_key(&decl.name) {
            return Err(RegistryError::DuplicateType { name: decl.name });
        }

        let parents: Vec<String> = decl.parents().cloned().collect();
        if let Some(parent) = parents
            .iter()
            .find(|parent| self.graph.would_create_cycle(&decl.name, std::slice::from_ref(*parent)))
        {
            return Err(RegistryError::InheritanceCycle {
                type_name: decl.name.clone(),
                parent: parent.clone(),
            });
        }

        self.graph.add_inheritance(&decl.name, &parents);
        debug!(
            type_name = %decl.name,
            kind = decl.kind.as_str(),
            parents = parents.len(),
            methods = decl.methods.len(),
            properties = decl.properties.len(),
            "declared type"
        );
        decls.insert(decl.name.clone(), Arc::new(decl));
        Ok(())
    }

    pub fn declare_all<I>(&self, decls: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = TypeDecl>,
    {
        for decl in decls {
            self.declare(decl)?;
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.decls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.decls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn graph(&self) -> &InheritanceGraph {
        &self.graph
    }

    fn merge_members(
        decls: &FxHashMap<String, Arc<TypeDecl>>,
        decl: &TypeDecl,
        out: &mut TypeDescriptor,
    ) -> Result<(), ReflectError> {
        for parent in decl.parents() {
            let parent_decl = decls
                .get(parent)
                .ok_or_else(|| ReflectError::UnknownParent {
                    type_name: decl.name.clone(),
                    parent: parent.clone(),
                })?;
            Self::merge_members(decls, parent_decl, out)?;
        }
        for method in &decl.methods {
            out.insert_method(method.clone());
        }
        for property in &decl.properties {
            out.insert_property(property.clone());
        }
        Ok(())
    }
}

impl NominalHierarchy for TypeRegistry {
    fn is_nominal_subtype(&self, sub: &str, sup: &str) -> bool {
        self.graph.is_nominal_subtype(sub, sup)
    }
}

impl Reflector for TypeRegistry {
    fn type_kind(&self, name: &str) -> Option<TypeKind> {
        self.decls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map(|decl| decl.kind)
    }

    fn reflect(&self, name: &str) -> Result<TypeDescriptor, ReflectError> {
        let decls = self.decls.read().unwrap_or_else(PoisonError::into_inner);
        let decl = decls.get(name).ok_or_else(|| ReflectError::UnknownType {
            name: name.to_string(),
        })?;

        let mut descriptor = TypeDescriptor::new(decl.name.clone(), decl.kind);
        Self::merge_members(&decls, decl, &mut descriptor)?;
        Ok(descriptor)
    }
}

#[cfg(test)]
#[path = "../tests/registry_tests.rs"]
mod tests;
