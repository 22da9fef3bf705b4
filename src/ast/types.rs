//! Type definitions.
//!
//! This module holds both sides of the language's types:
//!
//! - [`TypeNode`], the syntactic type annotations written in source
//!   (`Int`, `Point[]`, `String{}`)
//! - [`Type`], the semantic type lattice annotations resolve to, with the
//!   assignability and comparability relations the type checker relies on
//!
//! Struct, class and placeholder types are nominal: two of them are equal
//! only when they point at the same declaration.

use std::{fmt::Display, rc::Rc};

use crate::{type_checker::declarations::DeclId, Span};

use super::ast::NodeId;

/// A type annotation as written in the source.
#[derive(Debug, Clone)]
pub enum TypeNode {
    Symbol(SymbolType),
    Array(ArrayType),
    Set(SetType),
}

/// A named type, resolved later through the enclosing scopes.
#[derive(Debug, Clone)]
pub struct SymbolType {
    pub id: NodeId,
    pub name: String,
    pub span: Span,
}

/// `T[]`
#[derive(Debug, Clone)]
pub struct ArrayType {
    pub id: NodeId,
    pub underlying: Box<TypeNode>,
    pub span: Span,
}

/// `T{}`
#[derive(Debug, Clone)]
pub struct SetType {
    pub id: NodeId,
    pub underlying: Box<TypeNode>,
    pub span: Span,
}

impl TypeNode {
    pub fn id(&self) -> NodeId {
        match self {
            TypeNode::Symbol(ty) => ty.id,
            TypeNode::Array(ty) => ty.id,
            TypeNode::Set(ty) => ty.id,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            TypeNode::Symbol(ty) => &ty.span,
            TypeNode::Array(ty) => &ty.span,
            TypeNode::Set(ty) => &ty.span,
        }
    }
}

impl Display for TypeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeNode::Symbol(ty) => write!(f, "{}", ty.name),
            TypeNode::Array(ty) => write!(f, "{}[]", ty.underlying),
            TypeNode::Set(ty) => write!(f, "{}{{}}", ty.underlying),
        }
    }
}

/// Reference to a user declaration that introduces a type.
#[derive(Debug, Clone, Eq)]
pub struct NominalType {
    pub declaration: DeclId,
    pub name: Rc<str>,
}

impl PartialEq for NominalType {
    fn eq(&self, other: &Self) -> bool {
        self.declaration == other.declaration
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionType {
    pub return_type: Box<Type>,
    pub parameters: Vec<Type>,
}

/// The type of a template function.
///
/// `parameters` lists the placeholder types first, one per template type
/// parameter, followed by the value parameter types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateType {
    pub return_type: Box<Type>,
    pub type_parameter_count: usize,
    pub parameters: Vec<Type>,
}

impl TemplateType {
    pub fn placeholders(&self) -> &[Type] {
        &self.parameters[..self.type_parameter_count]
    }

    pub fn value_parameters(&self) -> &[Type] {
        &self.parameters[self.type_parameter_count..]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Void,
    Bool,
    Int,
    Float,
    String,
    Null,
    /// The type of a type used as a value, e.g. `var t: Type = Int`.
    Type,
    /// The type of the `pub`/`pvt` markers.
    Modifier,
    Array(Box<Type>),
    Set(Box<Type>),
    Struct(NominalType),
    Class(NominalType),
    Function(FunctionType),
    Template(TemplateType),
    /// A template type parameter, left opaque until instantiation.
    Placeholder(NominalType),
}

impl Type {
    pub fn array(component: Type) -> Type {
        Type::Array(Box::new(component))
    }

    pub fn set(component: Type) -> Type {
        Type::Set(Box::new(component))
    }

    pub fn function(return_type: Type, parameters: Vec<Type>) -> Type {
        Type::Function(FunctionType {
            return_type: Box::new(return_type),
            parameters,
        })
    }

    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            Type::String
                | Type::Null
                | Type::Array(_)
                | Type::Set(_)
                | Type::Struct(_)
                | Type::Class(_)
        )
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Type::Placeholder(_))
    }

    /// Whether a value of type `self` may be stored where `target` is expected.
    ///
    /// Placeholders are compatible with everything but `Void` since template
    /// bodies are only checked against their own signature.
    pub fn is_assignable_to(&self, target: &Type) -> bool {
        match (self, target) {
            (Type::Void, _) | (_, Type::Void) => false,
            (Type::Placeholder(_), _) | (_, Type::Placeholder(_)) => true,
            (Type::Int, Type::Float) => true,
            (Type::Array(source), Type::Array(target)) | (Type::Set(source), Type::Set(target)) => {
                source.is_assignable_to(target)
            }
            (Type::Null, target) if target.is_reference() => true,
            (source, target) => source == target,
        }
    }

    /// Whether `==` and `!=` may compare `self` with `other`.
    pub fn is_comparable_to(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Void, _) | (_, Type::Void) => false,
            (Type::Placeholder(_), _) | (_, Type::Placeholder(_)) => true,
            (Type::Int, Type::Float) | (Type::Float, Type::Int) => true,
            (a, b) => (a.is_reference() && b.is_reference()) || a == b,
        }
    }

    /// Replaces placeholders by the types bound to their declarations.
    pub fn substitute(&self, bindings: &[(DeclId, Type)]) -> Type {
        match self {
            Type::Placeholder(nominal) => bindings
                .iter()
                .find(|(declaration, _)| *declaration == nominal.declaration)
                .map(|(_, bound)| bound.clone())
                .unwrap_or_else(|| self.clone()),
            Type::Array(component) => Type::array(component.substitute(bindings)),
            Type::Set(component) => Type::set(component.substitute(bindings)),
            Type::Function(function) => Type::function(
                function.return_type.substitute(bindings),
                function
                    .parameters
                    .iter()
                    .map(|parameter| parameter.substitute(bindings))
                    .collect(),
            ),
            _ => self.clone(),
        }
    }
}

/// The most specific type both `a` and `b` can be stored into, if any.
pub fn common_supertype(a: &Type, b: &Type) -> Option<Type> {
    if *a == Type::Void || *b == Type::Void {
        None
    } else if a.is_assignable_to(b) {
        Some(b.clone())
    } else if b.is_assignable_to(a) {
        Some(a.clone())
    } else {
        None
    }
}

fn write_types(f: &mut std::fmt::Formatter<'_>, types: &[Type]) -> std::fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", ty)?;
    }
    Ok(())
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Void => write!(f, "Void"),
            Type::Bool => write!(f, "Bool"),
            Type::Int => write!(f, "Int"),
            Type::Float => write!(f, "Float"),
            Type::String => write!(f, "String"),
            Type::Null => write!(f, "Null"),
            Type::Type => write!(f, "Type"),
            Type::Modifier => write!(f, "Modifier"),
            Type::Array(component) => write!(f, "{}[]", component),
            Type::Set(component) => write!(f, "{}{{}}", component),
            Type::Struct(nominal) | Type::Class(nominal) | Type::Placeholder(nominal) => {
                write!(f, "{}", nominal.name)
            }
            Type::Function(function) => {
                write!(f, "(")?;
                write_types(f, &function.parameters)?;
                write!(f, ") -> {}", function.return_type)
            }
            Type::Template(template) => {
                write!(f, "<")?;
                write_types(f, template.placeholders())?;
                write!(f, ">(")?;
                write_types(f, template.value_parameters())?;
                write!(f, ") -> {}", template.return_type)
            }
        }
    }
}
