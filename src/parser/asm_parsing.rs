//! GNU inline assembly.
//!
//! `asm [volatile|inline] ( "template" [: outputs [: inputs [: clobbers]]] );`
//! with operands of the form `[name] "constraint" (expr)` and clobbers given
//! as string literals. The same form serves as a statement and as a
//! top-level declaration.

use crate::ast::*;
use crate::diagnostic::ParseError;
use crate::token::TokenKind;

use super::expressions::parse_string_literal;
use super::Parser;

pub(crate) fn parse_asm_statement(parser: &mut Parser) -> Result<AsmStmt, ParseError> {
    let token = parser.expect(TokenKind::Asm)?;

    let qualifier = match parser.current_kind()? {
        TokenKind::Volatile => {
            parser.advance()?;
            Some(AsmQualifier::Volatile)
        }
        TokenKind::Inline => {
            parser.advance()?;
            Some(AsmQualifier::Inline)
        }
        _ => None,
    };

    parser.expect(TokenKind::LeftParen)?;
    let (template, _) = parse_string_literal(parser)?;

    let mut outputs = Vec::new();
    let mut inputs = Vec::new();
    let mut clobbers = Vec::new();

    if parser.accept(TokenKind::Colon)?.is_some() {
        outputs = parse_asm_operands(parser)?;
        if parser.accept(TokenKind::Colon)?.is_some() {
            inputs = parse_asm_operands(parser)?;
            if parser.accept(TokenKind::Colon)?.is_some() {
                clobbers = parse_asm_clobbers(parser)?;
            }
        }
    }

    parser.expect(TokenKind::RightParen)?;
    parser.expect(TokenKind::Semicolon)?;

    let info = parser.info(token.pos);
    Ok(AsmStmt {
        qualifier,
        template,
        outputs,
        inputs,
        clobbers,
        info,
    })
}

fn parse_asm_operands(parser: &mut Parser) -> Result<Vec<AsmOperand>, ParseError> {
    let mut operands = Vec::new();
    if matches!(
        parser.current_kind()?,
        TokenKind::Colon | TokenKind::RightParen
    ) {
        return Ok(operands);
    }

    loop {
        let symbolic_name = if parser.accept(TokenKind::LeftBracket)?.is_some() {
            let name = parser.expect_name()?;
            parser.expect(TokenKind::RightBracket)?;
            Some(name)
        } else {
            None
        };

        let (constraint, _) = parse_string_literal(parser)?;
        parser.expect(TokenKind::LeftParen)?;
        let expr = parser.parse_expr_min()?;
        parser.expect(TokenKind::RightParen)?;

        operands.push(AsmOperand {
            symbolic_name,
            constraint,
            expr,
        });

        if parser.accept(TokenKind::Comma)?.is_none() {
            break;
        }
    }
    Ok(operands)
}

fn parse_asm_clobbers(parser: &mut Parser) -> Result<Vec<Symbol>, ParseError> {
    let mut clobbers = Vec::new();
    if matches!(
        parser.current_kind()?,
        TokenKind::Colon | TokenKind::RightParen
    ) {
        return Ok(clobbers);
    }

    loop {
        let (clobber, _) = parse_string_literal(parser)?;
        clobbers.push(clobber);
        if parser.accept(TokenKind::Comma)?.is_none() {
            break;
        }
    }
    Ok(clobbers)
}
