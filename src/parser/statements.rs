//! Statement parsing.
//!
//! Compound statements open a typedef scope around their body; `for` with a
//! declaration in the init clause opens one around the whole loop. The
//! dangling else attaches to the nearest `if`, which recursive descent does
//! by construction.

use crate::ast::*;
use crate::diagnostic::ParseError;
use crate::token::TokenKind;

use super::declaration_core::parse_attribute_list;
use super::declarations::{parse_declaration, parse_declaration_or_function, DeclOrFunction};
use super::Parser;

pub(crate) fn parse_statement(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let token = parser.current_token()?;

    // `name :` introduces a labeled statement. Only an ordinary identifier
    // can label; a typedef name here would start a declaration instead.
    if let TokenKind::Identifier(name) = token.kind {
        if parser.peek_second()?.kind == TokenKind::Colon {
            parser.advance()?;
            parser.advance()?;
            let label = parser.ident(name, token.pos);
            let attributes = parse_attribute_list(parser)?;
            let body = parse_statement(parser)?;
            let info = parser.info(token.pos);
            return Ok(Stmt::Labeled {
                label,
                attributes,
                body: Box::new(body),
                info,
            });
        }
    }

    match token.kind {
        TokenKind::LeftBrace => Ok(Stmt::Compound(parse_compound_statement(parser)?)),
        TokenKind::If => parse_if_statement(parser),
        TokenKind::Switch => parse_switch_statement(parser),
        TokenKind::While => parse_while_statement(parser),
        TokenKind::Do => parse_do_while_statement(parser),
        TokenKind::For => parse_for_statement(parser),
        TokenKind::Goto => parse_goto_statement(parser),
        TokenKind::Continue => {
            parser.advance()?;
            parser.expect(TokenKind::Semicolon)?;
            let info = parser.info(token.pos);
            Ok(Stmt::Continue { info })
        }
        TokenKind::Break => {
            parser.advance()?;
            parser.expect(TokenKind::Semicolon)?;
            let info = parser.info(token.pos);
            Ok(Stmt::Break { info })
        }
        TokenKind::Return => parse_return_statement(parser),
        TokenKind::Case => parse_case_statement(parser),
        TokenKind::Default => {
            parser.advance()?;
            parser.expect(TokenKind::Colon)?;
            let body = parse_statement(parser)?;
            let info = parser.info(token.pos);
            Ok(Stmt::Default {
                body: Box::new(body),
                info,
            })
        }
        TokenKind::Asm => Ok(Stmt::Asm(super::asm_parsing::parse_asm_statement(parser)?)),
        TokenKind::Semicolon => {
            parser.advance()?;
            let info = parser.info(token.pos);
            Ok(Stmt::Expr { expr: None, info })
        }
        _ => {
            let expr = parser.parse_expr_min()?;
            parser.expect(TokenKind::Semicolon)?;
            let info = parser.info(token.pos);
            Ok(Stmt::Expr {
                expr: Some(Box::new(expr)),
                info,
            })
        }
    }
}

pub(crate) fn parse_compound_statement(parser: &mut Parser) -> Result<CompoundStmt, ParseError> {
    let lbrace = parser.expect(TokenKind::LeftBrace)?;
    parser.enter_scope();
    let result = parse_compound_body(parser, lbrace.pos);
    parser.leave_scope();
    result
}

fn parse_compound_body(
    parser: &mut Parser,
    start: crate::position::Pos,
) -> Result<CompoundStmt, ParseError> {
    // GNU `__label__ a, b;` declarations come first.
    let mut local_labels = Vec::new();
    while parser.is_token(TokenKind::Label)? {
        parser.advance()?;
        loop {
            local_labels.push(parser.expect_identifier()?);
            if parser.accept(TokenKind::Comma)?.is_none() {
                break;
            }
        }
        parser.expect(TokenKind::Semicolon)?;
    }

    let mut items = Vec::new();
    loop {
        if parser.is_token(TokenKind::RightBrace)? {
            break;
        }
        if parser.at_eof()? {
            return Err(parser.syntax_error("`}`"));
        }
        items.push(parse_block_item(parser)?);
    }
    parser.expect(TokenKind::RightBrace)?;

    let info = parser.info(start);
    Ok(CompoundStmt {
        local_labels,
        items,
        info,
    })
}

/// Block items mix declarations, statements, and GNU nested function
/// definitions freely.
fn parse_block_item(parser: &mut Parser) -> Result<BlockItem, ParseError> {
    if parser.starts_declaration()? {
        match parse_declaration_or_function(parser, true)? {
            DeclOrFunction::Declaration(decl) => Ok(BlockItem::Declaration(decl)),
            DeclOrFunction::Function(def) => Ok(BlockItem::NestedFunction(Box::new(def))),
        }
    } else {
        Ok(BlockItem::Statement(parse_statement(parser)?))
    }
}

fn parse_if_statement(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let token = parser.advance()?;
    parser.expect(TokenKind::LeftParen)?;
    let cond = parser.parse_expr_min()?;
    parser.expect(TokenKind::RightParen)?;

    let then_branch = parse_statement(parser)?;
    let else_branch = if parser.accept(TokenKind::Else)?.is_some() {
        Some(Box::new(parse_statement(parser)?))
    } else {
        None
    };

    let info = parser.info(token.pos);
    Ok(Stmt::If {
        cond: Box::new(cond),
        then_branch: Box::new(then_branch),
        else_branch,
        info,
    })
}

fn parse_switch_statement(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let token = parser.advance()?;
    parser.expect(TokenKind::LeftParen)?;
    let cond = parser.parse_expr_min()?;
    parser.expect(TokenKind::RightParen)?;
    let body = parse_statement(parser)?;
    let info = parser.info(token.pos);
    Ok(Stmt::Switch {
        cond: Box::new(cond),
        body: Box::new(body),
        info,
    })
}

fn parse_while_statement(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let token = parser.advance()?;
    parser.expect(TokenKind::LeftParen)?;
    let cond = parser.parse_expr_min()?;
    parser.expect(TokenKind::RightParen)?;
    let body = parse_statement(parser)?;
    let info = parser.info(token.pos);
    Ok(Stmt::While {
        cond: Box::new(cond),
        body: Box::new(body),
        info,
    })
}

fn parse_do_while_statement(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let token = parser.advance()?;
    let body = parse_statement(parser)?;
    parser.expect(TokenKind::While)?;
    parser.expect(TokenKind::LeftParen)?;
    let cond = parser.parse_expr_min()?;
    parser.expect(TokenKind::RightParen)?;
    parser.expect(TokenKind::Semicolon)?;
    let info = parser.info(token.pos);
    Ok(Stmt::DoWhile {
        body: Box::new(body),
        cond: Box::new(cond),
        info,
    })
}

fn parse_for_statement(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let token = parser.advance()?;
    parser.expect(TokenKind::LeftParen)?;

    // A declaration in the init clause is scoped to the entire loop.
    parser.enter_scope();
    let result = parse_for_tail(parser, token.pos);
    parser.leave_scope();
    result
}

fn parse_for_tail(
    parser: &mut Parser,
    start: crate::position::Pos,
) -> Result<Stmt, ParseError> {
    let init = if parser.accept(TokenKind::Semicolon)?.is_some() {
        ForInit::Empty
    } else if parser.starts_declaration()? {
        ForInit::Decl(Box::new(parse_declaration(parser)?))
    } else {
        let expr = parser.parse_expr_min()?;
        parser.expect(TokenKind::Semicolon)?;
        ForInit::Expr(Box::new(expr))
    };

    let cond = if parser.is_token(TokenKind::Semicolon)? {
        None
    } else {
        Some(Box::new(parser.parse_expr_min()?))
    };
    parser.expect(TokenKind::Semicolon)?;

    let step = if parser.is_token(TokenKind::RightParen)? {
        None
    } else {
        Some(Box::new(parser.parse_expr_min()?))
    };
    parser.expect(TokenKind::RightParen)?;

    let body = parse_statement(parser)?;
    let info = parser.info(start);
    Ok(Stmt::For {
        init,
        cond,
        step,
        body: Box::new(body),
        info,
    })
}

fn parse_goto_statement(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let token = parser.advance()?;

    // `goto *expr;` is the GNU computed goto.
    if parser.accept(TokenKind::Star)?.is_some() {
        let target = parser.parse_expr_min()?;
        parser.expect(TokenKind::Semicolon)?;
        let info = parser.info(token.pos);
        return Ok(Stmt::GotoExpr {
            target: Box::new(target),
            info,
        });
    }

    let label = parser.expect_identifier()?;
    parser.expect(TokenKind::Semicolon)?;
    let info = parser.info(token.pos);
    Ok(Stmt::Goto { label, info })
}

fn parse_return_statement(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let token = parser.advance()?;
    let expr = if parser.is_token(TokenKind::Semicolon)? {
        None
    } else {
        Some(Box::new(parser.parse_expr_min()?))
    };
    parser.expect(TokenKind::Semicolon)?;
    let info = parser.info(token.pos);
    Ok(Stmt::Return { expr, info })
}

fn parse_case_statement(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let token = parser.advance()?;
    let lo = parser.parse_expr_conditional()?;

    // GNU case range: `case 'a' ... 'z':`.
    if parser.accept(TokenKind::Ellipsis)?.is_some() {
        let hi = parser.parse_expr_conditional()?;
        parser.expect(TokenKind::Colon)?;
        let body = parse_statement(parser)?;
        let info = parser.info(token.pos);
        return Ok(Stmt::CaseRange {
            lo: Box::new(lo),
            hi: Box::new(hi),
            body: Box::new(body),
            info,
        });
    }

    parser.expect(TokenKind::Colon)?;
    let body = parse_statement(parser)?;
    let info = parser.info(token.pos);
    Ok(Stmt::Case {
        expr: Box::new(lo),
        body: Box::new(body),
        info,
    })
}
