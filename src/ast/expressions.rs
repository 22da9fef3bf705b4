use std::fmt::Display;

use crate::Span;

use super::{
    ast::{Expr, NodeId},
    types::TypeNode,
};

#[derive(Debug, Clone)]
pub struct IntExpr {
    pub id: NodeId,
    pub value: i64,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FloatExpr {
    pub id: NodeId,
    pub value: f64,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct StringExpr {
    pub id: NodeId,
    pub value: String,
    pub span: Span,
}

/// A reference to a named declaration.
#[derive(Debug, Clone)]
pub struct SymbolExpr {
    pub id: NodeId,
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ParenExpr {
    pub id: NodeId,
    pub expression: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ArrayLiteralExpr {
    pub id: NodeId,
    pub elements: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct SetLiteralExpr {
    pub id: NodeId,
    pub elements: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
}

#[derive(Debug, Clone)]
pub struct PrefixExpr {
    pub id: NodeId,
    pub operator: UnaryOperator,
    pub right_expr: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Multiply,
    Divide,
    Remainder,
    Add,
    Subtract,
    Greater,
    Lower,
    GreaterEqual,
    LowerEqual,
    Equality,
    NotEquals,
    And,
    Or,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Remainder => "%",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Greater => ">",
            BinaryOperator::Lower => "<",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::LowerEqual => "<=",
            BinaryOperator::Equality => "==",
            BinaryOperator::NotEquals => "!=",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
        }
    }

    /// Verb used in diagnostics, e.g. "Trying to add Int with Bool".
    pub fn verb(&self) -> &'static str {
        match self {
            BinaryOperator::Multiply => "multiply",
            BinaryOperator::Divide => "divide",
            BinaryOperator::Remainder => "remainder",
            BinaryOperator::Add => "add",
            BinaryOperator::Subtract => "subtract",
            BinaryOperator::Greater => "greater",
            BinaryOperator::Lower => "lower",
            BinaryOperator::GreaterEqual => "greater_equal",
            BinaryOperator::LowerEqual => "lower_equal",
            BinaryOperator::Equality => "equality",
            BinaryOperator::NotEquals => "not_equals",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Multiply
                | BinaryOperator::Divide
                | BinaryOperator::Remainder
                | BinaryOperator::Add
                | BinaryOperator::Subtract
        )
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Greater
                | BinaryOperator::Lower
                | BinaryOperator::GreaterEqual
                | BinaryOperator::LowerEqual
        )
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, BinaryOperator::Equality | BinaryOperator::NotEquals)
    }

    pub fn is_logic(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub id: NodeId,
    pub left: Box<Expr>,
    pub operator: BinaryOperator,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct AssignmentExpr {
    pub id: NodeId,
    pub assignee: Box<Expr>,
    pub value: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct CallExpr {
    pub id: NodeId,
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

/// `name<T, U>(args)`
#[derive(Debug, Clone)]
pub struct TemplateCallExpr {
    pub id: NodeId,
    pub callee: Box<Expr>,
    pub type_arguments: Vec<TypeNode>,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IndexExpr {
    pub id: NodeId,
    pub array: Box<Expr>,
    pub index: Box<Expr>,
    pub span: Span,
}

/// `stem.field`
#[derive(Debug, Clone)]
pub struct FieldExpr {
    pub id: NodeId,
    pub stem: Box<Expr>,
    pub field: String,
    pub span: Span,
}

/// `stem$element`
#[derive(Debug, Clone)]
pub struct ClassElementExpr {
    pub id: NodeId,
    pub stem: Box<Expr>,
    pub element: String,
    pub span: Span,
}

/// `$Name`
#[derive(Debug, Clone)]
pub struct StructConstructorExpr {
    pub id: NodeId,
    pub reference: SymbolExpr,
    pub span: Span,
}

/// `create Name`
#[derive(Debug, Clone)]
pub struct ClassConstructorExpr {
    pub id: NodeId,
    pub reference: SymbolExpr,
    pub span: Span,
}

fn write_list<T: Display>(f: &mut std::fmt::Formatter<'_>, items: &[T]) -> std::fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Renders the expression back to source form for diagnostics.
impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Int(expr) => write!(f, "{}", expr.value),
            Expr::Float(expr) => write!(f, "{:?}", expr.value),
            Expr::String(expr) => write!(f, "{:?}", expr.value),
            Expr::Symbol(expr) => write!(f, "{}", expr.value),
            Expr::Paren(expr) => write!(f, "({})", expr.expression),
            Expr::ArrayLiteral(expr) => {
                write!(f, "[")?;
                write_list(f, &expr.elements)?;
                write!(f, "]")
            }
            Expr::SetLiteral(expr) => {
                write!(f, "{{")?;
                write_list(f, &expr.elements)?;
                write!(f, "}}")
            }
            Expr::Prefix(expr) => write!(f, "!{}", expr.right_expr),
            Expr::Binary(expr) => write!(
                f,
                "{} {} {}",
                expr.left,
                expr.operator.symbol(),
                expr.right
            ),
            Expr::Assignment(expr) => write!(f, "{} = {}", expr.assignee, expr.value),
            Expr::Call(expr) => {
                write!(f, "{}(", expr.callee)?;
                write_list(f, &expr.arguments)?;
                write!(f, ")")
            }
            Expr::TemplateCall(expr) => {
                write!(f, "{}<", expr.callee)?;
                write_list(f, &expr.type_arguments)?;
                write!(f, ">(")?;
                write_list(f, &expr.arguments)?;
                write!(f, ")")
            }
            Expr::Index(expr) => write!(f, "{}[{}]", expr.array, expr.index),
            Expr::Field(expr) => write!(f, "{}.{}", expr.stem, expr.field),
            Expr::ClassElement(expr) => write!(f, "{}${}", expr.stem, expr.element),
            Expr::StructConstructor(expr) => write!(f, "${}", expr.reference.value),
            Expr::ClassConstructor(expr) => write!(f, "create {}", expr.reference.value),
        }
    }
}
