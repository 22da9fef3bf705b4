//! Declarations every program starts with, bound in the root scope.

use crate::{ast::types::Type, Span};

use super::{
    declarations::DeclarationKind,
    reactor::Reactor,
    type_checker::SemanticContext,
    typed_ast::{Attribute, Value},
};

const TYPES: [(&str, Type); 7] = [
    ("Bool", Type::Bool),
    ("Int", Type::Int),
    ("Float", Type::Float),
    ("String", Type::String),
    ("Void", Type::Void),
    ("void", Type::Void),
    ("Type", Type::Type),
];

const SET_ELEMENTS: [(&str, Type); 3] = [
    ("Int", Type::Int),
    ("Float", Type::Float),
    ("String", Type::String),
];

fn declare(
    context: &mut SemanticContext,
    reactor: &mut Reactor<SemanticContext>,
    name: &str,
    kind: DeclarationKind,
    ty: Type,
    declared: Option<Type>,
) {
    let declaration = context
        .declarations
        .add(name, kind, None, Span::null());
    context
        .scopes
        .declare(context.scopes.root(), name, declaration);

    reactor.set(Attribute::type_of(declaration), Value::Type(ty));
    if let Some(declared) = declared {
        reactor.set(Attribute::declared(declaration), Value::Type(declared));
    }
}

/// Seeds the root scope with the built-in types, values and functions.
pub fn declare_builtins(context: &mut SemanticContext, reactor: &mut Reactor<SemanticContext>) {
    for (name, ty) in TYPES {
        declare(context, reactor, name, DeclarationKind::BuiltinType, Type::Type, Some(ty));
    }

    for modifier in ["pub", "pvt"] {
        declare(
            context,
            reactor,
            modifier,
            DeclarationKind::Modifier,
            Type::Type,
            Some(Type::Modifier),
        );
    }

    for (name, ty) in [("true", Type::Bool), ("false", Type::Bool), ("null", Type::Null)] {
        declare(context, reactor, name, DeclarationKind::BuiltinVariable, ty, None);
    }

    declare(
        context,
        reactor,
        "print",
        DeclarationKind::BuiltinFunction,
        Type::function(Type::String, vec![Type::String]),
        None,
    );

    for (suffix, element) in SET_ELEMENTS {
        let set = Type::set(element.clone());

        declare(
            context,
            reactor,
            &format!("addSet{}", suffix),
            DeclarationKind::BuiltinFunction,
            Type::function(set.clone(), vec![set.clone(), element.clone()]),
            None,
        );
        declare(
            context,
            reactor,
            &format!("containsSet{}", suffix),
            DeclarationKind::BuiltinFunction,
            Type::function(Type::Bool, vec![set, element]),
            None,
        );
    }
}
