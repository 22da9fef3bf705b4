//! Type parsing implementation.
//!
//! This module handles parsing of type annotations. It supports:
//!
//! - Named types (identifiers)
//! - Array types (`T[]`)
//! - Set types (`T{}`)
//!
//! Similar to expression parsing, it uses NUD/LED handlers with
//! binding powers for parsing nested type expressions.

use std::collections::HashMap;

use crate::{
    ast::types::{ArrayType, SetType, SymbolType, TypeNode},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser};

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeNode, Error>;

/// Type alias for type left denotation handler functions.
pub type TypeLEDHandler = fn(&mut Parser, TypeNode, BindingPower) -> Result<TypeNode, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Type alias for type LED lookup table.
pub type TypeLEDLookup = HashMap<TokenKind, TypeLEDHandler>;

/// Type alias for type binding power lookup table.
pub type TypeBPLookup = HashMap<TokenKind, BindingPower>;

/// Initializes the type parsing lookup tables.
///
/// Registers NUD and LED handlers for parsing type expressions.
///
/// # Arguments
///
/// * `parser` - Mutable reference to the parser to initialize
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
    parser.type_led(TokenKind::OpenBracket, BindingPower::Call, parse_array_type);
    parser.type_led(TokenKind::OpenCurly, BindingPower::Call, parse_set_type);
}

pub fn parse_symbol_type(parser: &mut Parser) -> Result<TypeNode, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    Ok(TypeNode::Symbol(SymbolType {
        id: parser.advance_id(),
        name: token.value,
        span: token.span,
    }))
}

pub fn parse_array_type(
    parser: &mut Parser,
    left: TypeNode,
    _bp: BindingPower,
) -> Result<TypeNode, Error> {
    parser.expect(TokenKind::OpenBracket)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(TypeNode::Array(ArrayType {
        id: parser.advance_id(),
        span: parser.span_from(left.span().start.clone()),
        underlying: Box::new(left),
    }))
}

pub fn parse_set_type(
    parser: &mut Parser,
    left: TypeNode,
    _bp: BindingPower,
) -> Result<TypeNode, Error> {
    parser.expect(TokenKind::OpenCurly)?;
    parser.expect(TokenKind::CloseCurly)?;

    Ok(TypeNode::Set(SetType {
        id: parser.advance_id(),
        span: parser.span_from(left.span().start.clone()),
        underlying: Box::new(left),
    }))
}

/// `{` only continues a type as the `{}` set suffix, and only where the
/// parser allows it.
fn is_type_suffix(parser: &Parser) -> bool {
    match parser.current_token_kind() {
        TokenKind::OpenCurly => {
            parser.allows_set_suffix() && parser.peek(1) == TokenKind::CloseCurly
        }
        TokenKind::OpenBracket => parser.peek(1) == TokenKind::CloseBracket,
        _ => true,
    }
}

pub fn parse_type(parser: &mut Parser, bp: BindingPower) -> Result<TypeNode, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_type_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.unexpected_detailed("expected a type"));
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = parser
            .get_type_bp_lookup()
            .get(&token_kind)
            .copied()
            .unwrap_or(BindingPower::Default);

        if next_bp <= bp || !is_type_suffix(parser) {
            break;
        }

        let Some(led) = parser.get_type_led_lookup().get(&token_kind).copied() else {
            break;
        };

        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}
