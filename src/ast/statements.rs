use std::slice::Iter;

use crate::Span;

use super::{
    ast::{Expr, NodeId, Stmt},
    types::TypeNode,
};

#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub id: NodeId,
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl BlockStmt {
    pub fn iter(&self) -> Iter<'_, Stmt> {
        self.body.iter()
    }
}

#[derive(Debug, Clone)]
pub struct ExpressionStmt {
    pub id: NodeId,
    pub expression: Expr,
    pub span: Span,
}

/// `var name: Type = value`
#[derive(Debug, Clone)]
pub struct VarDeclStmt {
    pub id: NodeId,
    pub identifier: String,
    pub explicit_type: TypeNode,
    pub assigned_value: Expr,
    pub span: Span,
}

/// `var name: Type`, a member without initializer.
#[derive(Debug, Clone)]
pub struct FieldDeclStmt {
    pub id: NodeId,
    pub identifier: String,
    pub explicit_type: TypeNode,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub id: NodeId,
    pub name: String,
    pub type_: TypeNode,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn keyword(&self) -> &'static str {
        match self {
            Visibility::Public => "pub",
            Visibility::Private => "pvt",
        }
    }
}

/// `[pub|pvt] fun name(params): Return { body }`
///
/// A missing return annotation is parsed as `Void`.
#[derive(Debug, Clone)]
pub struct FnDeclStmt {
    pub id: NodeId,
    pub visibility: Option<Visibility>,
    pub identifier: String,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeNode,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct StructDeclStmt {
    pub id: NodeId,
    pub identifier: String,
    pub fields: Vec<FieldDeclStmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Superclass {
    pub name: String,
    pub span: Span,
}

/// `[pub|pvt] class Name [from A, B] { body }`
#[derive(Debug, Clone)]
pub struct ClassDeclStmt {
    pub id: NodeId,
    pub visibility: Option<Visibility>,
    pub identifier: String,
    pub superclasses: Vec<Superclass>,
    pub body: BlockStmt,
    pub span: Span,
}

/// `T: Type` inside a template header.
#[derive(Debug, Clone)]
pub struct TemplateParameter {
    pub id: NodeId,
    pub name: String,
    pub bound: TypeNode,
    pub span: Span,
}

/// `template <T: Type, ..> fun name(params): Return { body }`
#[derive(Debug, Clone)]
pub struct TemplateDeclStmt {
    pub id: NodeId,
    pub type_parameters: Vec<TemplateParameter>,
    pub identifier: String,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeNode,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub id: NodeId,
    pub condition: Expr,
    pub then_body: Box<Stmt>,
    pub else_body: Option<Box<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub id: NodeId,
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub id: NodeId,
    pub value: Option<Expr>,
    pub span: Span,
}
