use crate::{
    ast::{
        ast::{Expr, Stmt},
        statements::{
            BlockStmt, ClassDeclStmt, ExpressionStmt, FieldDeclStmt, FnDeclStmt, IfStmt,
            Parameter, ReturnStmt, StructDeclStmt, Superclass, TemplateDeclStmt,
            TemplateParameter, VarDeclStmt, Visibility, WhileStmt,
        },
        types::{SymbolType, TypeNode},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
    Position, Span,
};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(handler) = parser.get_stmt_lookup().get(&parser.current_token_kind()).copied() {
        return handler(parser);
    }

    let start = parser.get_position();
    let expr = parse_expr(parser, BindingPower::Default)?;

    if !matches!(
        expr,
        Expr::Assignment(_) | Expr::Call(_) | Expr::TemplateCall(_)
    ) {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: expr.to_string(),
                message: String::from("expected an assignment or a call as statement"),
            },
            start,
        ));
    }

    Ok(Stmt::Expression(ExpressionStmt {
        id: parser.advance_id(),
        span: expr.span().clone(),
        expression: expr,
    }))
}

pub fn parse_block(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;

    let mut statements = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.unexpected_detailed("expected '}' to close the block"));
        }
        statements.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(BlockStmt {
        id: parser.advance_id(),
        body: statements,
        span: parser.span_from(start),
    })
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::Block(parse_block(parser)?))
}

/// `var name: Type = value`, or `var name: Type` for a field.
pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let error = parser.unexpected_detailed("expected identifier during variable declaration");
    let identifier = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    parser.expect(TokenKind::Colon)?;
    let explicit_type = parse_type(parser, BindingPower::Default)?;

    if parser.current_token_kind() != TokenKind::Assignment {
        return Ok(Stmt::FieldDecl(FieldDeclStmt {
            id: parser.advance_id(),
            identifier,
            explicit_type,
            span: parser.span_from(start),
        }));
    }

    parser.advance();
    let assigned_value = parse_expr(parser, BindingPower::Default)?;

    Ok(Stmt::VarDecl(VarDeclStmt {
        id: parser.advance_id(),
        identifier,
        explicit_type,
        assigned_value,
        span: parser.span_from(start),
    }))
}

fn parse_field_decl(parser: &mut Parser) -> Result<FieldDeclStmt, Error> {
    let start = parser.expect(TokenKind::Var)?.span.start;
    let identifier = parser.expect(TokenKind::Identifier)?.value;
    parser.expect(TokenKind::Colon)?;
    let explicit_type = parse_type(parser, BindingPower::Default)?;

    Ok(FieldDeclStmt {
        id: parser.advance_id(),
        identifier,
        explicit_type,
        span: parser.span_from(start),
    })
}

fn parse_parameters(parser: &mut Parser) -> Result<Vec<Parameter>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseParen {
        let token = parser.expect(TokenKind::Identifier)?;
        parser.expect(TokenKind::Colon)?;
        let type_ = parse_type(parser, BindingPower::Default)?;

        parameters.push(Parameter {
            id: parser.advance_id(),
            name: token.value,
            type_,
            span: parser.span_from(token.span.start),
        });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else if parser.current_token_kind() != TokenKind::CloseParen {
            return Err(parser.unexpected());
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok(parameters)
}

/// Parses `[: Type]` before a function body. `fun f(): Int {}` has an empty
/// body, not a set return type, so the set suffix is only kept when a body
/// still follows it.
fn parse_return_type(parser: &mut Parser) -> Result<TypeNode, Error> {
    if parser.current_token_kind() != TokenKind::Colon {
        return Ok(TypeNode::Symbol(SymbolType {
            id: parser.advance_id(),
            name: String::from("Void"),
            span: Span {
                start: parser.last_end(),
                end: parser.last_end(),
            },
        }));
    }
    parser.advance();

    let checkpoint = parser.checkpoint();
    let return_type = parse_type(parser, BindingPower::Default)?;
    if parser.current_token_kind() == TokenKind::OpenCurly {
        return Ok(return_type);
    }

    parser.restore(checkpoint);
    let previous = parser.set_allow_set_suffix(false);
    let return_type = parse_type(parser, BindingPower::Default);
    parser.set_allow_set_suffix(previous);
    return_type
}

fn parse_function(
    parser: &mut Parser,
    visibility: Option<Visibility>,
    start: Position,
) -> Result<Stmt, Error> {
    parser.expect(TokenKind::Fun)?;
    let identifier = parser.expect(TokenKind::Identifier)?.value;
    let parameters = parse_parameters(parser)?;
    let return_type = parse_return_type(parser)?;
    let body = parse_block(parser)?;

    Ok(Stmt::FnDecl(FnDeclStmt {
        id: parser.advance_id(),
        visibility,
        identifier,
        parameters,
        return_type,
        body,
        span: parser.span_from(start),
    }))
}

pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.get_position();
    parse_function(parser, None, start)
}

fn parse_class(
    parser: &mut Parser,
    visibility: Option<Visibility>,
    start: Position,
) -> Result<Stmt, Error> {
    parser.expect(TokenKind::Class)?;
    let identifier = parser.expect(TokenKind::Identifier)?.value;

    let mut superclasses = vec![];
    if parser.current_token_kind() == TokenKind::From {
        parser.advance();
        loop {
            let token = parser.expect(TokenKind::Identifier)?;
            superclasses.push(Superclass {
                name: token.value,
                span: token.span,
            });

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }

    let body = parse_block(parser)?;

    Ok(Stmt::ClassDecl(ClassDeclStmt {
        id: parser.advance_id(),
        visibility,
        identifier,
        superclasses,
        body,
        span: parser.span_from(start),
    }))
}

pub fn parse_class_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.get_position();
    parse_class(parser, None, start)
}

/// `pub`/`pvt` followed by a function or a class.
pub fn parse_modified_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.advance().clone();
    let visibility = match token.kind {
        TokenKind::Pub => Visibility::Public,
        _ => Visibility::Private,
    };

    match parser.current_token_kind() {
        TokenKind::Fun => parse_function(parser, Some(visibility), token.span.start),
        TokenKind::Class => parse_class(parser, Some(visibility), token.span.start),
        _ => Err(parser.unexpected_detailed("expected 'fun' or 'class' after a visibility modifier")),
    }
}

pub fn parse_struct_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();
    let identifier = parser.expect(TokenKind::Identifier)?.value;

    parser.expect(TokenKind::OpenCurly)?;

    let mut fields = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        fields.push(parse_field_decl(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Stmt::StructDecl(StructDeclStmt {
        id: parser.advance_id(),
        identifier,
        fields,
        span: parser.span_from(start),
    }))
}

/// `template <T: Type, ..> fun name(params) [: Return] { .. }`
pub fn parse_template_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();
    parser.expect(TokenKind::Less)?;

    let mut type_parameters = vec![];
    while parser.current_token_kind() != TokenKind::Greater {
        let token = parser.expect(TokenKind::Identifier)?;
        parser.expect(TokenKind::Colon)?;
        let bound = parse_type(parser, BindingPower::Default)?;

        type_parameters.push(TemplateParameter {
            id: parser.advance_id(),
            name: token.value,
            bound,
            span: parser.span_from(token.span.start),
        });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else if parser.current_token_kind() != TokenKind::Greater {
            return Err(parser.unexpected());
        }
    }
    parser.expect(TokenKind::Greater)?;

    parser.expect(TokenKind::Fun)?;
    let identifier = parser.expect(TokenKind::Identifier)?.value;
    let parameters = parse_parameters(parser)?;
    let return_type = parse_return_type(parser)?;
    let body = parse_block(parser)?;

    Ok(Stmt::TemplateDecl(TemplateDeclStmt {
        id: parser.advance_id(),
        type_parameters,
        identifier,
        parameters,
        return_type,
        body,
        span: parser.span_from(start),
    }))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    let then_body = parse_stmt(parser)?;

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(Box::new(parse_stmt(parser)?))
    } else {
        None
    };

    Ok(Stmt::If(IfStmt {
        id: parser.advance_id(),
        condition,
        then_body: Box::new(then_body),
        else_body,
        span: parser.span_from(start),
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    let body = parse_stmt(parser)?;

    Ok(Stmt::While(WhileStmt {
        id: parser.advance_id(),
        condition,
        body: Box::new(body),
        span: parser.span_from(start),
    }))
}

/// `return [value]`. The value is optional, so it is only parsed when the
/// next token can start an expression.
pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let value = if parser
        .get_nud_lookup()
        .contains_key(&parser.current_token_kind())
    {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    Ok(Stmt::Return(ReturnStmt {
        id: parser.advance_id(),
        value,
        span: parser.span_from(start),
    }))
}
