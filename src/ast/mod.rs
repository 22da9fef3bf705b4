//! Syntax tree module.
//!
//! Contains every definition related to the tree produced by the parser:
//!
//! - ast: node ids and the closed `Stmt`/`Expr` enums
//! - expressions: expression node structures and operators
//! - statements: statement and declaration node structures
//! - types: type annotations and the semantic type lattice

pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;

#[cfg(test)]
mod tests;
