//! Type descriptor model.
//!
//! A reflected type is normalized into a `TypeDescriptor`: an ordered set of
//! methods and properties whose signatures are written with `TypeRef`s.
//!
//! `TypeRef` is kept canonical at construction time:
//! - union members are named types, deduplicated and sorted (`null` last)
//! - a nullable union always carries the explicit `null` member
//! - a union with a single non-null member collapses to a nullable named type
//!   (`int|null` and `?int` are the same reference)

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

pub(crate) type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Universal type marker. Accepts every parameter type, `null` included.
pub const ANY: &str = "any";
/// Alias of [`ANY`].
pub const MIXED: &str = "mixed";
/// The null type.
pub const NULL: &str = "null";

/// Built-in names. These relate only by exact equality and are never handed
/// to the nominal hierarchy.
pub const SCALAR_TYPES: &[&str] = &[
    "int", "float", "string", "bool", "array", "object", "callable", "iterable", "void", "null",
    "never", "any", "mixed",
];

#[inline]
pub fn is_scalar_name(name: &str) -> bool {
    SCALAR_TYPES.contains(&name)
}

#[inline]
pub fn is_any_name(name: &str) -> bool {
    name == ANY || name == MIXED
}

/// Member visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a resolvable type name denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
}

impl TypeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
        }
    }
}

// =============================================================================
// Type references
// =============================================================================

/// A single named type with its nullability.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedType {
    pub name: String,
    pub nullable: bool,
}

impl NamedType {
    /// Named type without the `?` marker. `null`, `any` and `mixed` admit
    /// null on their own, so they are always nullable.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let nullable = name == NULL || is_any_name(&name);
        Self { name, nullable }
    }

    pub fn nullable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nullable: true,
        }
    }

    pub fn null() -> Self {
        Self::nullable(NULL)
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.name == NULL
    }

    #[inline]
    pub fn is_any(&self) -> bool {
        is_any_name(&self.name)
    }

    /// Nullable only because of an explicit `?` or `null` member.
    fn is_marked_nullable(&self) -> bool {
        self.nullable && !self.is_null() && !self.is_any()
    }

    // `null` sorts after every other member.
    fn sort_key(&self) -> (bool, &str) {
        (self.is_null(), self.name.as_str())
    }
}

impl fmt::Display for NamedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_marked_nullable() {
            f.write_str("?")?;
        }
        f.write_str(&self.name)
    }
}

/// "One of" several named types. Only constructed through [`TypeRef::union`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnionType {
    members: SmallVec<[NamedType; 4]>,
    nullable: bool,
}

impl UnionType {
    pub fn members(&self) -> &[NamedType] {
        &self.members
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }
}

/// A declared type: a named type or a union of named types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Named(NamedType),
    Union(UnionType),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(NamedType::new(name))
    }

    pub fn nullable(name: impl Into<String>) -> Self {
        TypeRef::Named(NamedType::nullable(name))
    }

    pub fn any() -> Self {
        Self::named(ANY)
    }

    /// Build a canonical union. A `?`-marked or `null` member (or the
    /// `nullable` flag) makes the whole union nullable through an explicit
    /// `null` member. An `any` member stays a plain member.
    pub fn union<I>(members: I, nullable: bool) -> Self
    where
        I: IntoIterator<Item = NamedType>,
    {
        let mut has_null = nullable;
        let mut canonical: SmallVec<[NamedType; 4]> = SmallVec::new();
        for member in members {
            if member.is_null() || member.is_marked_nullable() {
                has_null = true;
            }
            if member.is_null() {
                continue;
            }
            let member = NamedType::new(member.name);
            if !canonical.contains(&member) {
                canonical.push(member);
            }
        }
        canonical.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        match canonical.len() {
            0 => TypeRef::Named(NamedType::null()),
            1 => {
                let mut only = canonical.remove(0);
                only.nullable |= has_null;
                TypeRef::Named(only)
            }
            _ => {
                if has_null {
                    canonical.push(NamedType::null());
                }
                TypeRef::Union(UnionType {
                    members: canonical,
                    nullable: has_null,
                })
            }
        }
    }

    /// Union of plain names, e.g. `TypeRef::union_of(["int", "string"])`.
    pub fn union_of<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::union(names.into_iter().map(NamedType::new), false)
    }

    /// Whether `null` is an accepted value of this type.
    pub fn allows_null(&self) -> bool {
        match self {
            TypeRef::Named(named) => named.nullable,
            TypeRef::Union(union) => {
                union.nullable || union.members.iter().any(NamedType::is_any)
            }
        }
    }

    pub fn is_union(&self) -> bool {
        matches!(self, TypeRef::Union(_))
    }

    /// The named types this reference decomposes into.
    pub fn constituents(&self) -> &[NamedType] {
        match self {
            TypeRef::Named(named) => std::slice::from_ref(named),
            TypeRef::Union(union) => union.members(),
        }
    }

    /// Canonical name without the nullable marker (`?int` -> `int`).
    pub fn base_name(&self) -> String {
        match self {
            TypeRef::Named(named) => named.name.clone(),
            TypeRef::Union(_) => self.to_string(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(named) => fmt::Display::fmt(named, f),
            TypeRef::Union(union) => {
                for (i, member) in union.members.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    f.write_str(&member.name)?;
                }
                Ok(())
            }
        }
    }
}

/// Error produced when a type reference string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRefParseError {
    Empty,
    EmptyUnionMember { input: String },
    NullableUnion { input: String },
    NullableNull,
    InvalidName { name: String },
}

impl fmt::Display for TypeRefParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRefParseError::Empty => write!(f, "empty type reference"),
            TypeRefParseError::EmptyUnionMember { input } => {
                write!(f, "empty member in union type '{input}'")
            }
            TypeRefParseError::NullableUnion { input } => write!(
                f,
                "'?' cannot be applied to the union '{input}'; add a 'null' member instead"
            ),
            TypeRefParseError::NullableNull => write!(f, "'?null' is not a valid type"),
            TypeRefParseError::InvalidName { name } => write!(f, "invalid type name '{name}'"),
        }
    }
}

impl std::error::Error for TypeRefParseError {}

fn parse_name(raw: &str) -> Result<&str, TypeRefParseError> {
    let name = raw.trim();
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '\\')
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '\\' | ':' | '.'));
    if valid {
        Ok(name)
    } else {
        Err(TypeRefParseError::InvalidName {
            name: name.to_string(),
        })
    }
}

impl FromStr for TypeRef {
    type Err = TypeRefParseError;

    /// Grammar: `?Name` | `Name` | `Name|Name|...` (members may include `null`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(TypeRefParseError::Empty);
        }

        if let Some(rest) = text.strip_prefix('?') {
            if rest.contains('|') {
                return Err(TypeRefParseError::NullableUnion {
                    input: text.to_string(),
                });
            }
            let name = parse_name(rest)?;
            if name == NULL {
                return Err(TypeRefParseError::NullableNull);
            }
            return Ok(TypeRef::nullable(name));
        }

        if !text.contains('|') {
            return Ok(TypeRef::named(parse_name(text)?));
        }

        let mut members = Vec::new();
        for part in text.split('|') {
            if part.trim().is_empty() {
                return Err(TypeRefParseError::EmptyUnionMember {
                    input: text.to_string(),
                });
            }
            members.push(NamedType::new(parse_name(part)?));
        }
        Ok(TypeRef::union(members, false))
    }
}

impl Serialize for TypeRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}

// =============================================================================
// Descriptors
// =============================================================================

/// A positional parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub name: String,
    pub position: usize,
    pub declared_type: Option<TypeRef>,
}

/// A method signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    pub visibility: Visibility,
    pub parameters: Vec<ParameterDescriptor>,
    pub return_type: Option<TypeRef>,
}

impl MethodDescriptor {
    /// Public method with no parameters and no declared return type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            parameters: Vec::new(),
            return_type: None,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Append a parameter; its position is the current parameter count.
    pub fn param(mut self, name: impl Into<String>, declared_type: Option<TypeRef>) -> Self {
        let position = self.parameters.len();
        self.parameters.push(ParameterDescriptor {
            name: name.into(),
            position,
            declared_type,
        });
        self
    }

    pub fn typed_param(self, name: impl Into<String>, declared_type: TypeRef) -> Self {
        self.param(name, Some(declared_type))
    }

    pub fn returns(mut self, return_type: TypeRef) -> Self {
        self.return_type = Some(return_type);
        self
    }

    pub fn parameter(&self, position: usize) -> Option<&ParameterDescriptor> {
        self.parameters.get(position)
    }
}

/// A field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub visibility: Visibility,
    pub declared_type: Option<TypeRef>,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            declared_type: None,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn typed(mut self, declared_type: TypeRef) -> Self {
        self.declared_type = Some(declared_type);
        self
    }
}

/// The normalized shape of one type.
///
/// Member names are unique; adding a member with an existing name replaces
/// it without changing its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub type_name: String,
    pub kind: TypeKind,
    methods: FxIndexMap<String, MethodDescriptor>,
    properties: FxIndexMap<String, PropertyDescriptor>,
}

impl TypeDescriptor {
    pub fn new(type_name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            type_name: type_name.into(),
            kind,
            methods: FxIndexMap::default(),
            properties: FxIndexMap::default(),
        }
    }

    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.insert_method(method);
        self
    }

    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.insert_property(property);
        self
    }

    pub fn insert_method(&mut self, method: MethodDescriptor) {
        self.methods.insert(method.name.clone(), method);
    }

    pub fn insert_property(&mut self, property: PropertyDescriptor) {
        self.properties.insert(property.name.clone(), property);
    }

    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.get(name)
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    pub fn methods(&self) -> impl ExactSizeIterator<Item = &MethodDescriptor> {
        self.methods.values()
    }

    pub fn properties(&self) -> impl ExactSizeIterator<Item = &PropertyDescriptor> {
        self.properties.values()
    }

    pub fn member_count(&self) -> usize {
        self.methods.len() + self.properties.len()
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
