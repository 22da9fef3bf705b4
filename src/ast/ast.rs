//! Core tree definitions shared by the parser and the type checker.
//!
//! Node kinds form closed enums so every pass handles each kind through an
//! exhaustive `match`. Every node carries a [`NodeId`] (its key in the
//! attribute tables) and the [`Span`] it was parsed from.

use crate::{Span, MK_ID};

use super::{expressions::*, statements::*};

MK_ID!(NodeId);

/// Root of a parsed source file.
#[derive(Debug, Clone)]
pub struct Program {
    pub id: NodeId,
    pub span: Span,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Block(BlockStmt),
    VarDecl(VarDeclStmt),
    FieldDecl(FieldDeclStmt),
    FnDecl(FnDeclStmt),
    StructDecl(StructDeclStmt),
    ClassDecl(ClassDeclStmt),
    TemplateDecl(TemplateDeclStmt),
    If(IfStmt),
    While(WhileStmt),
    Return(ReturnStmt),
    Expression(ExpressionStmt),
}

impl Stmt {
    pub fn id(&self) -> NodeId {
        match self {
            Stmt::Block(stmt) => stmt.id,
            Stmt::VarDecl(stmt) => stmt.id,
            Stmt::FieldDecl(stmt) => stmt.id,
            Stmt::FnDecl(stmt) => stmt.id,
            Stmt::StructDecl(stmt) => stmt.id,
            Stmt::ClassDecl(stmt) => stmt.id,
            Stmt::TemplateDecl(stmt) => stmt.id,
            Stmt::If(stmt) => stmt.id,
            Stmt::While(stmt) => stmt.id,
            Stmt::Return(stmt) => stmt.id,
            Stmt::Expression(stmt) => stmt.id,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Stmt::Block(stmt) => &stmt.span,
            Stmt::VarDecl(stmt) => &stmt.span,
            Stmt::FieldDecl(stmt) => &stmt.span,
            Stmt::FnDecl(stmt) => &stmt.span,
            Stmt::StructDecl(stmt) => &stmt.span,
            Stmt::ClassDecl(stmt) => &stmt.span,
            Stmt::TemplateDecl(stmt) => &stmt.span,
            Stmt::If(stmt) => &stmt.span,
            Stmt::While(stmt) => &stmt.span,
            Stmt::Return(stmt) => &stmt.span,
            Stmt::Expression(stmt) => &stmt.span,
        }
    }

    /// Statements whose `returns` attribute feeds the enclosing block.
    pub fn is_return_container(&self) -> bool {
        matches!(self, Stmt::Block(_) | Stmt::If(_) | Stmt::Return(_))
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    Int(IntExpr),
    Float(FloatExpr),
    String(StringExpr),
    Symbol(SymbolExpr),
    Paren(ParenExpr),
    ArrayLiteral(ArrayLiteralExpr),
    SetLiteral(SetLiteralExpr),
    Prefix(PrefixExpr),
    Binary(BinaryExpr),
    Assignment(AssignmentExpr),
    Call(CallExpr),
    TemplateCall(TemplateCallExpr),
    Index(IndexExpr),
    Field(FieldExpr),
    ClassElement(ClassElementExpr),
    StructConstructor(StructConstructorExpr),
    ClassConstructor(ClassConstructorExpr),
}

impl Expr {
    pub fn id(&self) -> NodeId {
        match self {
            Expr::Int(expr) => expr.id,
            Expr::Float(expr) => expr.id,
            Expr::String(expr) => expr.id,
            Expr::Symbol(expr) => expr.id,
            Expr::Paren(expr) => expr.id,
            Expr::ArrayLiteral(expr) => expr.id,
            Expr::SetLiteral(expr) => expr.id,
            Expr::Prefix(expr) => expr.id,
            Expr::Binary(expr) => expr.id,
            Expr::Assignment(expr) => expr.id,
            Expr::Call(expr) => expr.id,
            Expr::TemplateCall(expr) => expr.id,
            Expr::Index(expr) => expr.id,
            Expr::Field(expr) => expr.id,
            Expr::ClassElement(expr) => expr.id,
            Expr::StructConstructor(expr) => expr.id,
            Expr::ClassConstructor(expr) => expr.id,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Expr::Int(expr) => &expr.span,
            Expr::Float(expr) => &expr.span,
            Expr::String(expr) => &expr.span,
            Expr::Symbol(expr) => &expr.span,
            Expr::Paren(expr) => &expr.span,
            Expr::ArrayLiteral(expr) => &expr.span,
            Expr::SetLiteral(expr) => &expr.span,
            Expr::Prefix(expr) => &expr.span,
            Expr::Binary(expr) => &expr.span,
            Expr::Assignment(expr) => &expr.span,
            Expr::Call(expr) => &expr.span,
            Expr::TemplateCall(expr) => &expr.span,
            Expr::Index(expr) => &expr.span,
            Expr::Field(expr) => &expr.span,
            Expr::ClassElement(expr) => &expr.span,
            Expr::StructConstructor(expr) => &expr.span,
            Expr::ClassConstructor(expr) => &expr.span,
        }
    }

    /// Expressions that denote a storage location.
    pub fn is_lvalue(&self) -> bool {
        matches!(
            self,
            Expr::Symbol(_) | Expr::Field(_) | Expr::Index(_) | Expr::ClassElement(_)
        )
    }

    /// The simple name a call through this expression is known by, used to
    /// look up overloads.
    pub fn callee_name(&self) -> Option<&str> {
        match self {
            Expr::Symbol(expr) => Some(&expr.value),
            Expr::Field(expr) => Some(&expr.field),
            Expr::ClassElement(expr) => Some(&expr.element),
            Expr::Paren(expr) => expr.expression.callee_name(),
            _ => None,
        }
    }
}
