//! Struct and union specifiers and their field declarations.
//!
//! A specifier with a tag and no body is a reference; a body, even an
//! empty one, is a definition. Field declarations reuse the general
//! specifier machinery but never touch the typedef environment: member
//! names live in their own namespace.

use thin_vec::ThinVec;

use crate::ast::*;
use crate::diagnostic::ParseError;
use crate::position::Pos;
use crate::token::TokenKind;

use super::declaration_core::{parse_attribute_list, parse_declaration_specifiers};
use super::declarator::{attach_attributes, parse_declarator, DeclaratorContext};
use super::Parser;

/// Parse the remainder of a struct/union specifier; the keyword itself has
/// already been consumed by the specifier loop.
pub(crate) fn parse_record_specifier(
    parser: &mut Parser,
    kind: RecordKind,
    start: Pos,
) -> Result<RecordSpecifier, ParseError> {
    // Attributes may follow the keyword (`struct __attribute__((packed)) S`),
    // the tag, and the closing brace; all end up on the specifier.
    let mut attributes = parse_attribute_list(parser)?;
    let tag = parser.accept_name()?;
    attributes.extend(parse_attribute_list(parser)?);

    let members = if parser.accept(TokenKind::LeftBrace)?.is_some() {
        let mut members = Vec::new();
        while !parser.is_token(TokenKind::RightBrace)? {
            if parser.accept(TokenKind::Semicolon)?.is_some() {
                continue;
            }
            members.push(parse_field_declaration(parser)?);
        }
        parser.expect(TokenKind::RightBrace)?;
        attributes.extend(parse_attribute_list(parser)?);
        Some(members)
    } else {
        None
    };

    let info = parser.info(start);
    Ok(RecordSpecifier {
        kind,
        tag,
        members,
        attributes,
        info,
    })
}

fn parse_field_declaration(parser: &mut Parser) -> Result<Declaration, ParseError> {
    while parser.accept(TokenKind::Extension)?.is_some() {}

    let start = parser.current_pos()?;
    let specifiers = parse_declaration_specifiers(parser)?;

    let mut declarators: ThinVec<InitDeclarator> = ThinVec::new();
    if !parser.is_token(TokenKind::Semicolon)? {
        loop {
            // An unnamed bit-field (`int : 0;`) has no declarator at all.
            let declarator = if parser.is_token(TokenKind::Colon)? {
                None
            } else {
                Some(parse_declarator(parser, DeclaratorContext::Named)?)
            };

            let bit_width = if parser.accept(TokenKind::Colon)?.is_some() {
                Some(parser.parse_expr_conditional()?)
            } else {
                None
            };

            let attributes = parse_attribute_list(parser)?;
            let declarator = attach_attributes(parser, declarator, attributes)?;

            declarators.push(InitDeclarator {
                declarator,
                initializer: None,
                bit_width,
            });

            if parser.accept(TokenKind::Comma)?.is_none() {
                break;
            }
        }
    }

    parser.expect(TokenKind::Semicolon)?;

    let info = parser.info(start);
    Ok(Declaration {
        specifiers,
        declarators,
        info,
    })
}
