//! Declarator parsing.
//!
//! Declarators are parsed as layers folded around a core variable
//! declarator: leading pointers accumulate outside-in, array and function
//! postfixes left-to-right. The three contexts correspond to the grammar's
//! declarator families: `Named` for declarations (ordinary identifiers and
//! redeclared typedef names), `Parameter` for parameter positions (where a
//! typedef name may be the parameter's name, but a parenthesized typedef
//! name is a parameter list), and `Abstract` for type names (no identifier
//! at all).

use thin_vec::ThinVec;

use crate::ast::*;
use crate::diagnostic::ParseError;
use crate::position::Pos;
use crate::token::TokenKind;

use super::declaration_core::{
    parse_attribute_list, parse_declaration_specifiers, parse_type_qualifier_list,
};
use super::Parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeclaratorContext {
    Named,
    Parameter,
    Abstract,
}

pub(crate) fn parse_declarator(
    parser: &mut Parser,
    ctx: DeclaratorContext,
) -> Result<Declarator, ParseError> {
    // Attributes before a declarator bind to the identifier it declares.
    let leading = parse_attribute_list(parser)?;
    let declarator = parse_pointer_declarator(parser, ctx)?;
    declarator.annotate(None, leading)
}

fn parse_pointer_declarator(
    parser: &mut Parser,
    ctx: DeclaratorContext,
) -> Result<Declarator, ParseError> {
    let mut pointers: Vec<(ThinVec<TypeQualifier>, Pos)> = Vec::new();
    while let Some(star) = parser.accept(TokenKind::Star)? {
        let qualifiers = parse_type_qualifier_list(parser)?;
        pointers.push((qualifiers, star.pos));
    }

    let mut declarator = parse_direct_declarator(parser, ctx)?;

    // The innermost star is the last one read, so wrap in reverse.
    for (qualifiers, pos) in pointers.into_iter().rev() {
        let info = parser.info(pos);
        declarator = Declarator::Pointer(PointerDeclarator {
            qualifiers,
            inner: Box::new(declarator),
            info,
        });
    }
    Ok(declarator)
}

fn parse_direct_declarator(
    parser: &mut Parser,
    ctx: DeclaratorContext,
) -> Result<Declarator, ParseError> {
    let token = parser.current_token()?;

    let mut declarator = match token.kind {
        TokenKind::Identifier(name) => {
            if ctx == DeclaratorContext::Abstract {
                return Err(parser.syntax_error("an abstract declarator"));
            }
            parser.advance()?;
            let ident = parser.ident(name, token.pos);
            let info = parser.info(token.pos);
            Declarator::Var(VarDeclarator {
                name: Some(ident),
                asm_name: None,
                attributes: ThinVec::new(),
                info,
            })
        }

        // A typedef name in declarator position is being redeclared; in a
        // parameter list this is the parameter-typedef-declarator subset.
        TokenKind::TypedefName(name) if ctx != DeclaratorContext::Abstract => {
            parser.advance()?;
            let ident = parser.ident(name, token.pos);
            let info = parser.info(token.pos);
            Declarator::Var(VarDeclarator {
                name: Some(ident),
                asm_name: None,
                attributes: ThinVec::new(),
                info,
            })
        }

        TokenKind::LeftParen if nested_declarator_follows(parser, ctx)? => {
            parser.advance()?;
            let inner = parse_declarator(parser, ctx)?;
            parser.expect(TokenKind::RightParen)?;
            inner
        }

        _ => {
            if ctx == DeclaratorContext::Named {
                return Err(parser.syntax_error("a declarator"));
            }
            // Abstract core; the postfix loop below may still wrap it.
            let info = parser.info(token.pos);
            Declarator::Var(VarDeclarator {
                name: None,
                asm_name: None,
                attributes: ThinVec::new(),
                info,
            })
        }
    };

    loop {
        let token = parser.current_token()?;
        match token.kind {
            TokenKind::LeftBracket => {
                parser.advance()?;
                // C99 `[static N]` / `[const static N]`: the static marker
                // is accepted and dropped, qualifiers are kept.
                parser.accept(TokenKind::Static)?;
                let qualifiers = parse_type_qualifier_list(parser)?;
                parser.accept(TokenKind::Static)?;

                let size = if parser.is_token(TokenKind::RightBracket)? {
                    None
                } else if parser.is_token(TokenKind::Star)?
                    && parser.peek_second()?.kind == TokenKind::RightBracket
                {
                    // `[*]` VLA marker in prototypes carries no size.
                    parser.advance()?;
                    None
                } else {
                    Some(Box::new(parser.parse_expr_assignment()?))
                };
                parser.expect(TokenKind::RightBracket)?;

                let info = parser.info(token.pos);
                declarator = Declarator::Array(ArrayDeclarator {
                    inner: Box::new(declarator),
                    qualifiers,
                    size,
                    info,
                });
            }

            TokenKind::LeftParen => {
                parser.advance()?;
                let params = parse_parameter_list(parser)?;
                parser.expect(TokenKind::RightParen)?;
                let info = parser.info(token.pos);
                declarator = Declarator::Function(FunctionDeclarator {
                    inner: Box::new(declarator),
                    params,
                    attributes: ThinVec::new(),
                    info,
                });
            }

            _ => break,
        }
    }

    Ok(declarator)
}

/// Decide whether `(` opens a nested declarator or a parameter list for an
/// anonymous core. A type-name head after the paren means parameters; so
/// does a typedef name, except in `Named` context where `int (T);`
/// redeclares `T`.
fn nested_declarator_follows(
    parser: &mut Parser,
    ctx: DeclaratorContext,
) -> Result<bool, ParseError> {
    let second = parser.peek_second()?.kind;
    Ok(match second {
        TokenKind::Star | TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::Attribute => {
            true
        }
        TokenKind::Identifier(_) => ctx != DeclaratorContext::Abstract,
        TokenKind::TypedefName(_) => ctx == DeclaratorContext::Named,
        _ => false,
    })
}

/// Parameter form after the opening paren: an old-style identifier list
/// (empty for `()`), or a prototype.
pub(crate) fn parse_parameter_list(parser: &mut Parser) -> Result<ParamList, ParseError> {
    if parser.is_token(TokenKind::RightParen)? {
        // `()` leaves the arguments unspecified; old-style with no names.
        return Ok(ParamList::Identifiers(Vec::new()));
    }

    if matches!(parser.current_kind()?, TokenKind::Identifier(_)) {
        let mut names = Vec::new();
        loop {
            names.push(parser.expect_identifier()?);
            if parser.accept(TokenKind::Comma)?.is_none() {
                break;
            }
        }
        return Ok(ParamList::Identifiers(names));
    }

    // Prototype parameters get their own scope: each parameter name shadows
    // outer typedefs for the remainder of the list.
    parser.enter_scope();
    let result = parse_prototype_params(parser);
    parser.leave_scope();
    let (params, variadic) = result?;
    Ok(ParamList::Prototype { params, variadic })
}

fn parse_prototype_params(parser: &mut Parser) -> Result<(Vec<ParamDecl>, bool), ParseError> {
    let mut params = Vec::new();
    let mut variadic = false;
    loop {
        if parser.accept(TokenKind::Ellipsis)?.is_some() {
            variadic = true;
            break;
        }

        let param = parse_parameter_declaration(parser)?;
        if let Some(declarator) = &param.declarator {
            if let Some(name) = declarator.name() {
                parser.shadow_typedef(name.name);
            }
        }
        params.push(param);

        if parser.accept(TokenKind::Comma)?.is_none() {
            break;
        }
    }
    Ok((params, variadic))
}

fn parse_parameter_declaration(parser: &mut Parser) -> Result<ParamDecl, ParseError> {
    let start = parser.current_pos()?;
    let specifiers = parse_declaration_specifiers(parser)?;

    let declarator = if matches!(
        parser.current_kind()?,
        TokenKind::Comma | TokenKind::RightParen
    ) {
        None
    } else {
        Some(parse_declarator(parser, DeclaratorContext::Parameter)?)
    };

    let attributes = parse_attribute_list(parser)?;
    let declarator = attach_attributes(parser, declarator, attributes)?;

    let info = parser.info(start);
    Ok(ParamDecl {
        specifiers,
        declarator: declarator.map(Box::new),
        info,
    })
}

/// Attach trailing attributes to a possibly absent declarator. An unnamed
/// slot (an unnamed bit-field, an abstract parameter) gets an anonymous
/// variable declarator so the attributes are not dropped.
pub(crate) fn attach_attributes(
    parser: &mut Parser,
    declarator: Option<Declarator>,
    attributes: ThinVec<Attribute>,
) -> Result<Option<Declarator>, ParseError> {
    if attributes.is_empty() {
        return Ok(declarator);
    }
    match declarator {
        Some(declarator) => Ok(Some(declarator.annotate(None, attributes)?)),
        None => {
            let pos = attributes[0].info.pos;
            let info = parser.info(pos);
            Ok(Some(Declarator::Var(VarDeclarator {
                name: None,
                asm_name: None,
                attributes,
                info,
            })))
        }
    }
}
