use super::*;
use crate::types::{TypeRef, Visibility};

fn ty(text: &str) -> TypeRef {
    text.parse().unwrap()
}

fn method_names(descriptor: &TypeDescriptor) -> Vec<&str> {
    descriptor.methods().map(|m| m.name.as_str()).collect()
}

#[test]
fn test_reflect_own_members() {
    let registry = TypeRegistry::new();
    registry
        .declare(
            TypeDecl::class("Page")
                .method(MethodDescriptor::new("render").returns(ty("string")))
                .property(PropertyDescriptor::new("content").typed(ty("string"))),
        )
        .unwrap();

    let descriptor = registry.reflect("Page").unwrap();
    assert_eq!(descriptor.type_name, "Page");
    assert_eq!(descriptor.kind, TypeKind::Class);
    assert_eq!(method_names(&descriptor), vec!["render"]);
    assert!(descriptor.property("content").is_some());
}

#[test]
fn test_interface_inherits_parent_interface_methods() {
    let registry = TypeRegistry::new();
    registry
        .declare_all([
            TypeDecl::interface("BaseInterface")
                .method(MethodDescriptor::new("execute").returns(ty("void"))),
            TypeDecl::interface("ExtendedInterface")
                .extends("BaseInterface")
                .method(MethodDescriptor::new("render").returns(ty("string"))),
        ])
        .unwrap();

    let descriptor = registry.reflect("ExtendedInterface").unwrap();
    assert_eq!(method_names(&descriptor), vec!["execute", "render"]);
    assert_eq!(registry.type_kind("ExtendedInterface"), Some(TypeKind::Interface));
}

#[test]
fn test_class_inherits_private_members_and_overrides_in_place() {
    let registry = TypeRegistry::new();
    registry
        .declare_all([
            TypeDecl::class("Base")
                .method(MethodDescriptor::new("secret").with_visibility(Visibility::Private))
                .method(MethodDescriptor::new("render").returns(ty("string")))
                .method(MethodDescriptor::new("close")),
            TypeDecl::class("Child")
                .extends("Base")
                .method(MethodDescriptor::new("render").returns(ty("?string")))
                .method(MethodDescriptor::new("extra")),
        ])
        .unwrap();

    let descriptor = registry.reflect("Child").unwrap();
    assert_eq!(
        method_names(&descriptor),
        vec!["secret", "render", "close", "extra"]
    );
    assert_eq!(
        descriptor.method("render").unwrap().return_type,
        Some(ty("?string"))
    );
    assert_eq!(
        descriptor.method("secret").unwrap().visibility,
        Visibility::Private
    );
}

#[test]
fn test_nominal_subtyping_through_extends_and_implements() {
    let registry = TypeRegistry::new();
    registry
        .declare_all([
            TypeDecl::interface("Shape"),
            TypeDecl::class("Polygon").implements("Shape"),
            TypeDecl::class("Square").extends("Polygon"),
        ])
        .unwrap();

    assert!(registry.is_nominal_subtype("Square", "Polygon"));
    assert!(registry.is_nominal_subtype("Square", "Shape"));
    assert!(registry.is_nominal_subtype("Shape", "Shape"));
    assert!(!registry.is_nominal_subtype("Shape", "Square"));
}

#[test]
fn test_unknown_type() {
    let registry = TypeRegistry::new();
    assert_eq!(registry.type_kind("Ghost"), None);
    assert_eq!(
        registry.reflect("Ghost"),
        Err(ReflectError::UnknownType {
            name: "Ghost".to_string()
        })
    );
}

#[test]
fn test_unknown_parent_fails_reflection_not_declaration() {
    let registry = TypeRegistry::new();
    registry
        .declare(TypeDecl::class("Orphan").extends("Missing"))
        .unwrap();

    assert_eq!(
        registry.reflect("Orphan"),
        Err(ReflectError::UnknownParent {
            type_name: "Orphan".to_string(),
            parent: "Missing".to_string()
        })
    );

    registry.declare(TypeDecl::class("Missing")).unwrap();
    assert!(registry.reflect("Orphan").is_ok());
}

#[test]
fn test_duplicate_declaration_rejected() {
    let registry = TypeRegistry::new();
    registry.declare(TypeDecl::class("Page")).unwrap();

    assert_eq!(
        registry.declare(TypeDecl::interface("Page")),
        Err(RegistryError::DuplicateType {
            name: "Page".to_string()
        })
    );
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_inheritance_cycle_rejected() {
    let registry = TypeRegistry::new();
    registry.declare(TypeDecl::interface("A").extends("B")).unwrap();
    registry.declare(TypeDecl::interface("B").extends("C")).unwrap();

    let err = registry
        .declare(TypeDecl::interface("C").extends("A"))
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::InheritanceCycle {
            type_name: "C".to_string(),
            parent: "A".to_string()
        }
    );
    assert!(!registry.contains("C"));

    let err = registry
        .declare(TypeDecl::interface("Selfish").extends("Selfish"))
        .unwrap_err();
    assert!(matches!(err, RegistryError::InheritanceCycle { .. }));
}

#[test]
fn test_kind_rules() {
    let registry = TypeRegistry::new();
    assert!(matches!(
        registry.declare(TypeDecl::class("Both").extends("A").extends("B")),
        Err(RegistryError::MultipleClassParents { .. })
    ));
    assert!(matches!(
        registry.declare(TypeDecl::interface("I").implements("J")),
        Err(RegistryError::InterfaceImplements { .. })
    ));
    assert!(registry.is_empty());
}
