//! Semantic analysis.
//!
//! Walks the syntax tree once, in document order, and decorates it:
//!
//! - every name is resolved to its declaration through the scope table
//! - every expression and declaration receives a type
//! - every block, `if` and `return` learns whether it always returns
//! - every typing constraint is checked
//!
//! Facts that cannot be known at the point of the walk, such as the type of
//! a function called before its declaration, are registered as rules with
//! the [`reactor`] and resolved once the walk is over.

pub mod builtins;
pub mod declarations;
pub mod reactor;
pub mod registry;
pub mod scope;
pub mod type_checker;
pub mod typed_ast;

#[cfg(test)]
mod tests;
