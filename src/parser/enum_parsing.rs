//! Enum specifiers.

use crate::ast::*;
use crate::diagnostic::ParseError;
use crate::position::Pos;
use crate::token::TokenKind;

use super::declaration_core::parse_attribute_list;
use super::Parser;

/// Parse the remainder of an enum specifier; the `enum` keyword has already
/// been consumed. A trailing comma after the last enumerator is accepted.
pub(crate) fn parse_enum_specifier(
    parser: &mut Parser,
    start: Pos,
) -> Result<EnumSpecifier, ParseError> {
    let mut attributes = parse_attribute_list(parser)?;
    let tag = parser.accept_name()?;
    attributes.extend(parse_attribute_list(parser)?);

    let enumerators = if parser.accept(TokenKind::LeftBrace)?.is_some() {
        let mut enumerators = Vec::new();
        while !parser.is_token(TokenKind::RightBrace)? {
            let name = parser.expect_identifier()?;
            let value = if parser.accept(TokenKind::Assign)?.is_some() {
                Some(parser.parse_expr_conditional()?)
            } else {
                None
            };
            enumerators.push(Enumerator { name, value });

            if parser.accept(TokenKind::Comma)?.is_none() {
                break;
            }
        }
        parser.expect(TokenKind::RightBrace)?;
        attributes.extend(parse_attribute_list(parser)?);
        Some(enumerators)
    } else {
        None
    };

    let info = parser.info(start);
    Ok(EnumSpecifier {
        tag,
        enumerators,
        attributes,
        info,
    })
}
