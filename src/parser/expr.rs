use crate::{
    ast::{
        ast::Expr,
        expressions::{
            ArrayLiteralExpr, AssignmentExpr, BinaryExpr, BinaryOperator, CallExpr,
            ClassConstructorExpr, ClassElementExpr, FieldExpr, FloatExpr, IndexExpr, IntExpr,
            ParenExpr, PrefixExpr, SetLiteralExpr, StringExpr, StructConstructorExpr, SymbolExpr,
            TemplateCallExpr, UnaryOperator,
        },
        types::TypeNode,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, Span,
};

use super::{lookups::BindingPower, parser::Parser, types::parse_type};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.unexpected());
    };

    let mut left = nud(parser)?;

    loop {
        // `name<T>(..)` shares its first token with `<`, so it is recognised
        // by looking ahead before operators are considered.
        if bp < BindingPower::Call && is_template_call(parser, &left) {
            left = parse_template_call_expr(parser, left)?;
            continue;
        }

        // While LED and current BP is less than BP of current token, continue parsing lhs
        let token_kind = parser.current_token_kind();
        let next_bp = parser
            .get_bp_lookup()
            .get(&token_kind)
            .copied()
            .unwrap_or(BindingPower::Default);

        if next_bp <= bp {
            break;
        }

        let Some(led) = parser.get_led_lookup().get(&token_kind).copied() else {
            break;
        };

        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

fn parse_number(parser: &mut Parser, token: Token, negative: bool, start: Position) -> Result<Expr, Error> {
    let text = if negative {
        format!("-{}", token.value)
    } else {
        token.value.clone()
    };
    let span = Span {
        start,
        end: token.span.end.clone(),
    };
    let error = || {
        Error::new(
            ErrorImpl::NumberParseError {
                token: text.clone(),
            },
            token.span.start.clone(),
        )
    };

    if token.value.contains('.') {
        let value = text.parse::<f64>().map_err(|_| error())?;
        Ok(Expr::Float(FloatExpr {
            id: parser.advance_id(),
            value,
            span,
        }))
    } else {
        let value = text.parse::<i64>().map_err(|_| error())?;
        Ok(Expr::Int(IntExpr {
            id: parser.advance_id(),
            value,
            span,
        }))
    }
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    match parser.current_token_kind() {
        TokenKind::Number => {
            let token = parser.advance().clone();
            let start = token.span.start.clone();
            parse_number(parser, token, false, start)
        }
        TokenKind::Identifier => {
            let token = parser.advance().clone();
            Ok(Expr::Symbol(SymbolExpr {
                id: parser.advance_id(),
                value: token.value,
                span: token.span,
            }))
        }
        TokenKind::String => {
            let token = parser.advance().clone();
            Ok(Expr::String(StringExpr {
                id: parser.advance_id(),
                value: token.value,
                span: token.span,
            }))
        }
        _ => Err(parser.unexpected()),
    }
}

/// `-` directly followed by a number literal.
pub fn parse_negative_literal_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();
    if parser.current_token_kind() != TokenKind::Number {
        return Err(parser.unexpected_detailed("expected a number after '-'"));
    }

    let token = parser.advance().clone();
    parse_number(parser, token, true, start)
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Star => Some(BinaryOperator::Multiply),
        TokenKind::Slash => Some(BinaryOperator::Divide),
        TokenKind::Percent => Some(BinaryOperator::Remainder),
        TokenKind::Plus => Some(BinaryOperator::Add),
        TokenKind::Dash => Some(BinaryOperator::Subtract),
        TokenKind::Greater => Some(BinaryOperator::Greater),
        TokenKind::Less => Some(BinaryOperator::Lower),
        TokenKind::GreaterEquals => Some(BinaryOperator::GreaterEqual),
        TokenKind::LessEquals => Some(BinaryOperator::LowerEqual),
        TokenKind::Equals => Some(BinaryOperator::Equality),
        TokenKind::NotEquals => Some(BinaryOperator::NotEquals),
        TokenKind::And => Some(BinaryOperator::And),
        TokenKind::Or => Some(BinaryOperator::Or),
        _ => None,
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let Some(operator) = binary_operator(parser.current_token_kind()) else {
        return Err(parser.unexpected());
    };
    parser.advance();

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        id: parser.advance_id(),
        span: left.span().to(right.span()),
        left: Box::new(left),
        operator,
        right: Box::new(right),
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();
    let rhs = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Prefix(PrefixExpr {
        id: parser.advance_id(),
        span: Span {
            start,
            end: rhs.span().end.clone(),
        },
        operator: UnaryOperator::Not,
        right_expr: Box::new(rhs),
    }))
}

/// Assignment is right associative: `a = b = c` assigns `c` to `b` first.
pub fn parse_assignment_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let rhs = parse_expr(parser, BindingPower::Comma)?;

    Ok(Expr::Assignment(AssignmentExpr {
        id: parser.advance_id(),
        span: left.span().to(rhs.span()),
        value: Box::new(rhs),
        assignee: Box::new(left),
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::Paren(ParenExpr {
        id: parser.advance_id(),
        span: parser.span_from(start),
        expression: Box::new(expr),
    }))
}

/// Comma separated expressions up to `close`, which is consumed.
fn parse_expression_list(parser: &mut Parser, close: TokenKind) -> Result<Vec<Expr>, Error> {
    let mut expressions = vec![];

    while parser.current_token_kind() != close {
        expressions.push(parse_expr(parser, BindingPower::Comma)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else if parser.current_token_kind() != close {
            return Err(parser.unexpected());
        }
    }

    parser.expect(close)?;
    Ok(expressions)
}

pub fn parse_array_literal_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();
    let elements = parse_expression_list(parser, TokenKind::CloseBracket)?;

    Ok(Expr::ArrayLiteral(ArrayLiteralExpr {
        id: parser.advance_id(),
        span: parser.span_from(start),
        elements,
    }))
}

pub fn parse_set_literal_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();
    let elements = parse_expression_list(parser, TokenKind::CloseCurly)?;

    Ok(Expr::SetLiteral(SetLiteralExpr {
        id: parser.advance_id(),
        span: parser.span_from(start),
        elements,
    }))
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let arguments = parse_expression_list(parser, TokenKind::CloseParen)?;

    Ok(Expr::Call(CallExpr {
        id: parser.advance_id(),
        span: parser.span_from(left.span().start.clone()),
        callee: Box::new(left),
        arguments,
    }))
}

pub fn parse_index_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenBracket)?;
    let index = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(Expr::Index(IndexExpr {
        id: parser.advance_id(),
        span: parser.span_from(left.span().start.clone()),
        array: Box::new(left),
        index: Box::new(index),
    }))
}

pub fn parse_field_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.expect(TokenKind::Dot)?;
    let field = parser.expect(TokenKind::Identifier)?.value;

    Ok(Expr::Field(FieldExpr {
        id: parser.advance_id(),
        span: parser.span_from(left.span().start.clone()),
        stem: Box::new(left),
        field,
    }))
}

pub fn parse_class_element_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.expect(TokenKind::Dollar)?;
    let element = parser.expect(TokenKind::Identifier)?.value;

    Ok(Expr::ClassElement(ClassElementExpr {
        id: parser.advance_id(),
        span: parser.span_from(left.span().start.clone()),
        stem: Box::new(left),
        element,
    }))
}

fn parse_reference(parser: &mut Parser) -> Result<SymbolExpr, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    Ok(SymbolExpr {
        id: parser.advance_id(),
        value: token.value,
        span: token.span,
    })
}

pub fn parse_struct_constructor_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();
    let reference = parse_reference(parser)?;

    Ok(Expr::StructConstructor(StructConstructorExpr {
        id: parser.advance_id(),
        span: parser.span_from(start),
        reference,
    }))
}

pub fn parse_class_constructor_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();
    let reference = parse_reference(parser)?;

    Ok(Expr::ClassConstructor(ClassConstructorExpr {
        id: parser.advance_id(),
        span: parser.span_from(start),
        reference,
    }))
}

/// Whether the tokens ahead read `< Type, .. > (`.
fn is_template_call(parser: &Parser, left: &Expr) -> bool {
    if parser.current_token_kind() != TokenKind::Less
        || !matches!(left, Expr::Symbol(_) | Expr::Field(_) | Expr::ClassElement(_))
    {
        return false;
    }

    let mut offset = 1;
    if parser.peek(offset) != TokenKind::Greater {
        loop {
            if parser.peek(offset) != TokenKind::Identifier {
                return false;
            }
            offset += 1;

            while matches!(
                (parser.peek(offset), parser.peek(offset + 1)),
                (TokenKind::OpenBracket, TokenKind::CloseBracket)
                    | (TokenKind::OpenCurly, TokenKind::CloseCurly)
            ) {
                offset += 2;
            }

            match parser.peek(offset) {
                TokenKind::Comma => offset += 1,
                TokenKind::Greater => break,
                _ => return false,
            }
        }
    }

    parser.peek(offset + 1) == TokenKind::OpenParen
}

pub fn parse_template_call_expr(parser: &mut Parser, left: Expr) -> Result<Expr, Error> {
    parser.expect(TokenKind::Less)?;

    let mut type_arguments: Vec<TypeNode> = vec![];
    while parser.current_token_kind() != TokenKind::Greater {
        type_arguments.push(parse_type(parser, BindingPower::Default)?);
        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        }
    }
    parser.expect(TokenKind::Greater)?;

    parser.expect(TokenKind::OpenParen)?;
    let arguments = parse_expression_list(parser, TokenKind::CloseParen)?;

    Ok(Expr::TemplateCall(TemplateCallExpr {
        id: parser.advance_id(),
        span: parser.span_from(left.span().start.clone()),
        callee: Box::new(left),
        type_arguments,
        arguments,
    }))
}
