//! JSON manifest: declared types plus the checks to run against them.

use anyhow::{Context, Result};
use ducktype_solver::{
    CheckPolicy, MethodDescriptor, PropertyDescriptor, TypeDecl, TypeKind, TypeRef, TypeRegistry,
    Visibility,
};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub types: Vec<TypeEntry>,
    #[serde(default)]
    pub checks: Vec<CheckEntry>,
    #[serde(default)]
    pub widen_any_parameters: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeEntry {
    pub name: String,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default)]
    pub extends: Vec<String>,
    #[serde(default)]
    pub implements: Vec<String>,
    #[serde(default)]
    pub methods: Vec<MethodEntry>,
    #[serde(default)]
    pub properties: Vec<PropertyEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodEntry {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub params: Vec<ParamEntry>,
    #[serde(default)]
    pub returns: Option<TypeRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParamEntry {
    pub name: String,
    #[serde(default, rename = "type")]
    pub declared_type: Option<TypeRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertyEntry {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default, rename = "type")]
    pub declared_type: Option<TypeRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckEntry {
    pub candidate: String,
    pub contract: String,
}

pub fn parse_manifest(source: &str) -> Result<Manifest> {
    serde_json::from_str(source).context("invalid manifest JSON")
}

pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest: {}", path.display()))?;
    parse_manifest(&source).with_context(|| format!("failed to parse manifest: {}", path.display()))
}

impl Manifest {
    /// Declare every type, in manifest order.
    pub fn build_registry(&self) -> Result<TypeRegistry> {
        let registry = TypeRegistry::new();
        for entry in &self.types {
            registry
                .declare(entry.to_decl())
                .with_context(|| format!("failed to declare type {}", entry.name))?;
        }
        Ok(registry)
    }

    pub fn policy(&self) -> CheckPolicy {
        CheckPolicy::new().with_widen_any_parameters(self.widen_any_parameters)
    }
}

impl TypeEntry {
    pub fn to_decl(&self) -> TypeDecl {
        let mut decl = TypeDecl::new(self.name.clone(), self.kind);
        decl.extends = self.extends.clone();
        decl.implements = self.implements.clone();
        decl.methods = self.methods.iter().map(MethodEntry::to_descriptor).collect();
        decl.properties = self
            .properties
            .iter()
            .map(PropertyEntry::to_descriptor)
            .collect();
        decl
    }
}

impl MethodEntry {
    fn to_descriptor(&self) -> MethodDescriptor {
        let mut method = MethodDescriptor::new(self.name.clone()).with_visibility(self.visibility);
        for param in &self.params {
            method = method.param(param.name.clone(), param.declared_type.clone());
        }
        if let Some(return_type) = &self.returns {
            method = method.returns(return_type.clone());
        }
        method
    }
}

impl PropertyEntry {
    fn to_descriptor(&self) -> PropertyDescriptor {
        let property = PropertyDescriptor::new(self.name.clone()).with_visibility(self.visibility);
        match &self.declared_type {
            Some(declared_type) => property.typed(declared_type.clone()),
            None => property,
        }
    }
}
