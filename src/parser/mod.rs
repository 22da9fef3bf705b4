//! Parser module for building the syntax tree.
//!
//! This module contains the parser that transforms a stream of tokens
//! into a [`Program`](crate::ast::ast::Program). It uses a Pratt parser for
//! expressions with operator precedence and handles:
//!
//! - Statement parsing (declarations, blocks, control flow)
//! - Expression parsing (operators, calls, member access, literals)
//! - Type parsing for type annotations
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.
//! Parsing stops at the first syntax error.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
