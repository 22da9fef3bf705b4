use std::rc::Rc;

use super::types::{common_supertype, NominalType, TemplateType, Type};
use crate::type_checker::declarations::DeclId;

fn class(id: u32, name: &str) -> Type {
    Type::Class(NominalType {
        declaration: DeclId::from_raw(id),
        name: Rc::from(name),
    })
}

fn placeholder(id: u32, name: &str) -> Type {
    Type::Placeholder(NominalType {
        declaration: DeclId::from_raw(id),
        name: Rc::from(name),
    })
}

#[test]
fn test_int_widens_to_float() {
    assert!(Type::Int.is_assignable_to(&Type::Float));
    assert!(!Type::Float.is_assignable_to(&Type::Int));
    assert!(Type::array(Type::Int).is_assignable_to(&Type::array(Type::Float)));
    assert!(!Type::set(Type::Float).is_assignable_to(&Type::set(Type::Int)));
}

#[test]
fn test_null_is_assignable_to_references_only() {
    assert!(Type::Null.is_assignable_to(&Type::String));
    assert!(Type::Null.is_assignable_to(&Type::array(Type::Int)));
    assert!(Type::Null.is_assignable_to(&class(4, "Dog")));
    assert!(!Type::Null.is_assignable_to(&Type::Int));
    assert!(!Type::Null.is_assignable_to(&Type::Bool));
}

#[test]
fn test_void_is_assignable_to_nothing() {
    assert!(!Type::Void.is_assignable_to(&Type::Void));
    assert!(!Type::Int.is_assignable_to(&Type::Void));
    assert!(!Type::Void.is_assignable_to(&placeholder(1, "T")));
}

#[test]
fn test_nominal_types_compare_by_declaration() {
    assert_eq!(class(3, "A"), class(3, "Renamed"));
    assert_ne!(class(3, "A"), class(5, "A"));
    assert!(!class(3, "A").is_assignable_to(&class(5, "A")));
}

#[test]
fn test_placeholders_are_permissive() {
    let t = placeholder(1, "T");
    assert!(Type::Int.is_assignable_to(&t));
    assert!(t.is_assignable_to(&Type::String));
    assert!(t.is_comparable_to(&Type::Bool));
}

#[test]
fn test_comparability() {
    assert!(Type::Int.is_comparable_to(&Type::Float));
    assert!(Type::String.is_comparable_to(&Type::Null));
    assert!(class(1, "A").is_comparable_to(&Type::array(Type::Int)));
    assert!(Type::Bool.is_comparable_to(&Type::Bool));
    assert!(!Type::Bool.is_comparable_to(&Type::Int));
    assert!(!Type::Void.is_comparable_to(&Type::Void));
}

#[test]
fn test_common_supertype() {
    assert_eq!(common_supertype(&Type::Int, &Type::Float), Some(Type::Float));
    assert_eq!(common_supertype(&Type::Float, &Type::Int), Some(Type::Float));
    assert_eq!(common_supertype(&Type::Int, &Type::Int), Some(Type::Int));
    assert_eq!(common_supertype(&Type::Null, &Type::String), Some(Type::String));
    assert_eq!(common_supertype(&Type::Int, &Type::String), None);
    assert_eq!(common_supertype(&Type::Void, &Type::Void), None);
}

#[test]
fn test_common_supertype_is_symmetric() {
    let types = [
        Type::Int,
        Type::Float,
        Type::Null,
        Type::String,
        Type::Bool,
        Type::array(Type::Int),
        Type::array(Type::Float),
        class(2, "A"),
    ];

    for a in &types {
        for b in &types {
            assert_eq!(common_supertype(a, b), common_supertype(b, a), "{} / {}", a, b);
        }
    }
}

#[test]
fn test_substitute_replaces_bound_placeholders() {
    let t = placeholder(7, "T");
    let u = placeholder(8, "U");
    let bindings = vec![(DeclId::from_raw(7), Type::Int)];

    assert_eq!(Type::array(t.clone()).substitute(&bindings), Type::array(Type::Int));
    assert_eq!(u.substitute(&bindings), u);
    assert_eq!(
        Type::function(t.clone(), vec![Type::set(t)]).substitute(&bindings),
        Type::function(Type::Int, vec![Type::set(Type::Int)])
    );
}

#[test]
fn test_display() {
    assert_eq!(Type::array(Type::set(Type::Int)).to_string(), "Int{}[]");
    assert_eq!(
        Type::function(Type::Bool, vec![Type::Int, class(1, "Dog")]).to_string(),
        "(Int, Dog) -> Bool"
    );

    let template = Type::Template(TemplateType {
        return_type: Box::new(placeholder(1, "T")),
        type_parameter_count: 1,
        parameters: vec![placeholder(1, "T"), Type::array(placeholder(1, "T"))],
    });
    assert_eq!(template.to_string(), "<T>(T[]) -> T");
}
