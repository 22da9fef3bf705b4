use std::fmt::Display;

use thiserror::Error;

use crate::{ast::ast::NodeId, Position, Span};

/// A diagnostic produced by any stage of the front end.
///
/// Lexing and parsing errors only carry a position. Semantic errors are
/// attached to the tree node they were reported against.
#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    span: Span,
    node: Option<NodeId>,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            span: Span {
                start: position.clone(),
                end: position,
            },
            node: None,
        }
    }

    pub fn at_node(error_impl: ErrorImpl, span: Span, node: NodeId) -> Self {
        Error {
            internal_error: error_impl,
            span,
            node: Some(node),
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.span.start
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    pub fn get_node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnresolvedName { .. } | ErrorImpl::UnresolvedType { .. } => "UnresolvedName",
            ErrorImpl::UsedBeforeDeclaration { .. } => "UsedBeforeDeclaration",
            ErrorImpl::NotATypeDeclaration { .. } | ErrorImpl::InvalidSuperclass { .. } => {
                "UnexpectedDeclaration"
            }
            ErrorImpl::IncompatibleInitializer { .. }
            | ErrorImpl::IncompatibleArgument { .. }
            | ErrorImpl::IncompatibleReturn { .. }
            | ErrorImpl::IncompatibleLvalue
            | ErrorImpl::ReturnWithoutValue
            | ErrorImpl::ReturnWithValueInVoid
            | ErrorImpl::InvalidArithmetic { .. }
            | ErrorImpl::NonNumericComparison { .. }
            | ErrorImpl::NonBooleanLogic { .. }
            | ErrorImpl::InvalidNegation { .. } => "TypeMismatch",
            ErrorImpl::IncomparableTypes { .. } => "IncomparableTypes",
            ErrorImpl::NonBooleanCondition { .. } => "NonBooleanCondition",
            ErrorImpl::NonIntegerIndex => "NonIntegerIndex",
            ErrorImpl::NonArrayIndexed { .. }
            | ErrorImpl::NonLengthArrayMember { .. }
            | ErrorImpl::InvalidFieldTarget { .. }
            | ErrorImpl::InvalidClassElementTarget { .. } => "InvalidAccessTarget",
            ErrorImpl::MissingField { .. } => "MissingMember",
            ErrorImpl::WrongArity { .. }
            | ErrorImpl::NoMatchingOverload { .. }
            | ErrorImpl::WrongTypeArgumentCount { .. } => "WrongArity",
            ErrorImpl::MissingReturn => "MissingReturn",
            ErrorImpl::NonLvalue => "NonLvalue",
            ErrorImpl::NotCallable { .. }
            | ErrorImpl::NotAStruct { .. }
            | ErrorImpl::NotAClass { .. }
            | ErrorImpl::NotATemplate { .. } => "NotCallable",
            ErrorImpl::VoidLiteralElement { .. } => "VoidLiteralElement",
            ErrorImpl::NoCommonSupertype { .. } => "NoCommonSupertype",
            ErrorImpl::UninferableLiteral { .. } => "UninferableLiteral",
            ErrorImpl::UnresolvedAttribute { .. } => "UnresolvedAttribute",
            ErrorImpl::CyclicDependency { .. } => "CyclicDependency",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            semantic => ErrorTip::Suggestion(semantic.to_string()),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },

    #[error("Could not resolve: {name}")]
    UnresolvedName { name: String },
    #[error("could not resolve: {name}")]
    UnresolvedType { name: String },
    #[error("Variable used before declaration: {name}")]
    UsedBeforeDeclaration { name: String },
    #[error("{name} did not resolve to a type declaration but to a {kind} declaration")]
    NotATypeDeclaration { name: String, kind: String },
    #[error("{name} did not resolve to a class declaration but to a {kind} declaration")]
    InvalidSuperclass { name: String, kind: String },

    #[error("incompatible initializer type provided for variable `{variable}`: expected {expected} but got {received}")]
    IncompatibleInitializer {
        variable: String,
        expected: String,
        received: String,
    },
    #[error("incompatible argument provided for argument {index}: expected {expected} but got {received}")]
    IncompatibleArgument {
        index: usize,
        expected: String,
        received: String,
    },
    #[error("Incompatible return type, expected {expected} but got {received}")]
    IncompatibleReturn { expected: String, received: String },
    #[error("Return without value in a function with a return type.")]
    ReturnWithoutValue,
    #[error("Return with value in a Void function.")]
    ReturnWithValueInVoid,
    #[error("Trying to assign a value to a non-compatible lvalue.")]
    IncompatibleLvalue,
    #[error("Trying to assign to an non-lvalue expression.")]
    NonLvalue,

    #[error("Trying to {operation} {left} with {right}")]
    InvalidArithmetic {
        operation: String,
        left: String,
        right: String,
    },
    #[error("Attempting to perform arithmetic comparison on non-numeric type: {type_}")]
    NonNumericComparison { type_: String },
    #[error("Attempting to perform binary logic on non-boolean type: {type_}")]
    NonBooleanLogic { type_: String },
    #[error("Trying to compare incomparable types {left} and {right}")]
    IncomparableTypes { left: String, right: String },
    #[error("Trying to negate type: {type_}")]
    InvalidNegation { type_: String },
    #[error("{statement} statement with a non-boolean condition of type: {type_}")]
    NonBooleanCondition { statement: String, type_: String },

    #[error("Indexing an array using a non-Int-valued expression")]
    NonIntegerIndex,
    #[error("Trying to index a non-array expression of type {type_}")]
    NonArrayIndexed { type_: String },
    #[error("Trying to access a non-length {member} on an array")]
    NonLengthArrayMember { member: String },
    #[error("Trying to access a field on an expression of type {type_}")]
    InvalidFieldTarget { type_: String },
    #[error("Trying to access a class element on an expression of type {type_}")]
    InvalidClassElementTarget { type_: String },
    #[error("Trying to access missing field {field} on {owner_kind} {owner}")]
    MissingField {
        field: String,
        owner_kind: String,
        owner: String,
    },

    #[error("trying to call a non-function expression: {callee}")]
    NotCallable { callee: String },
    #[error("Applying the constructor operator ($) to non-struct reference for: {name}")]
    NotAStruct { name: String },
    #[error("Applying the class constructor (create) to non-class reference for: {name}")]
    NotAClass { name: String },
    #[error("trying to call a non-template expression: {callee}")]
    NotATemplate { callee: String },
    #[error("wrong number of arguments, expected {expected} but got {received}")]
    WrongArity { expected: usize, received: usize },
    #[error("wrong number of arguments/wrong args type, expected {expected} but got {received}")]
    NoMatchingOverload { expected: usize, received: usize },
    #[error("wrong number of types passed, expected {expected} but got {received}")]
    WrongTypeArgumentCount { expected: usize, received: usize },

    #[error("Missing return in function.")]
    MissingReturn,
    #[error("Void-valued expression in {literal} literal")]
    VoidLiteralElement { literal: String },
    #[error("Could not find common supertype in {literal} literal.")]
    NoCommonSupertype { literal: String },
    #[error("Could not infer the type of an empty {literal} literal")]
    UninferableLiteral { literal: String },

    #[error("Could not compute {attribute}")]
    UnresolvedAttribute { attribute: String },
    #[error("Cyclic dependency while computing {attribute}")]
    CyclicDependency { attribute: String },
}
