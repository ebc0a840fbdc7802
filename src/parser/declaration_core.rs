//! Declaration specifiers, attributes, type names, and initializers.
//!
//! C lets storage classes, qualifiers, and type specifiers appear in any
//! order, so the specifier list is parsed as one accumulation loop. The
//! classification of a typedef-name token does the work the grammar's four
//! specifier families do: it is a type specifier only while the list has no
//! type specifier yet; afterwards it must be the declared name. Lists with
//! qualifiers or storage classes but no type specifier are allowed (they
//! occur in K&R parameter declarations); an entirely empty list is an error.

use log::debug;
use thin_vec::ThinVec;

use crate::ast::*;
use crate::diagnostic::ParseError;
use crate::token::TokenKind;

use super::declarator::{parse_declarator, DeclaratorContext};
use super::expressions::{parse_attribute_args, parse_string_literal};
use super::Parser;

pub(crate) fn parse_declaration_specifiers(
    parser: &mut Parser,
) -> Result<ThinVec<DeclSpecifier>, ParseError> {
    let mut specifiers = ThinVec::new();
    let mut has_type_specifier = false;

    loop {
        let token = parser.current_token()?;
        match token.kind {
            TokenKind::Typedef
            | TokenKind::Extern
            | TokenKind::Static
            | TokenKind::Auto
            | TokenKind::Register
            | TokenKind::Thread => {
                let storage_class = match token.kind {
                    TokenKind::Typedef => StorageClass::Typedef,
                    TokenKind::Extern => StorageClass::Extern,
                    TokenKind::Static => StorageClass::Static,
                    TokenKind::Auto => StorageClass::Auto,
                    TokenKind::Register => StorageClass::Register,
                    TokenKind::Thread => StorageClass::Thread,
                    _ => unreachable!(),
                };
                parser.advance()?;
                let info = parser.info(token.pos);
                specifiers.push(DeclSpecifier::Storage(storage_class, info));
            }

            TokenKind::Const => {
                parser.advance()?;
                let info = parser.info(token.pos);
                specifiers.push(DeclSpecifier::Qualifier(TypeQualifier::Const(info)));
            }
            TokenKind::Volatile => {
                parser.advance()?;
                let info = parser.info(token.pos);
                specifiers.push(DeclSpecifier::Qualifier(TypeQualifier::Volatile(info)));
            }
            TokenKind::Restrict => {
                parser.advance()?;
                let info = parser.info(token.pos);
                specifiers.push(DeclSpecifier::Qualifier(TypeQualifier::Restrict(info)));
            }
            TokenKind::Inline => {
                parser.advance()?;
                let info = parser.info(token.pos);
                specifiers.push(DeclSpecifier::Qualifier(TypeQualifier::Inline(info)));
            }

            TokenKind::Attribute => {
                // Attribute-as-qualifier: the annotation rides along in the
                // specifier list at the position it appeared.
                for attribute in parse_attribute_specifier(parser)? {
                    specifiers.push(DeclSpecifier::Qualifier(TypeQualifier::Attribute(attribute)));
                }
            }

            TokenKind::Void
            | TokenKind::Char
            | TokenKind::Short
            | TokenKind::Int
            | TokenKind::Long
            | TokenKind::Float
            | TokenKind::Double
            | TokenKind::Signed
            | TokenKind::Unsigned
            | TokenKind::Bool
            | TokenKind::Complex => {
                parser.advance()?;
                let info = parser.info(token.pos);
                let specifier = match token.kind {
                    TokenKind::Void => TypeSpecifier::Void(info),
                    TokenKind::Char => TypeSpecifier::Char(info),
                    TokenKind::Short => TypeSpecifier::Short(info),
                    TokenKind::Int => TypeSpecifier::Int(info),
                    TokenKind::Long => TypeSpecifier::Long(info),
                    TokenKind::Float => TypeSpecifier::Float(info),
                    TokenKind::Double => TypeSpecifier::Double(info),
                    TokenKind::Signed => TypeSpecifier::Signed(info),
                    TokenKind::Unsigned => TypeSpecifier::Unsigned(info),
                    TokenKind::Bool => TypeSpecifier::Bool(info),
                    TokenKind::Complex => TypeSpecifier::Complex(info),
                    _ => unreachable!(),
                };
                specifiers.push(DeclSpecifier::Type(specifier));
                has_type_specifier = true;
            }

            TokenKind::Struct | TokenKind::Union => {
                let kind = if token.kind == TokenKind::Union {
                    RecordKind::Union
                } else {
                    RecordKind::Struct
                };
                parser.advance()?;
                let record = super::struct_parsing::parse_record_specifier(parser, kind, token.pos)?;
                specifiers.push(DeclSpecifier::Type(TypeSpecifier::Record(record)));
                has_type_specifier = true;
            }

            TokenKind::Enum => {
                parser.advance()?;
                let spec = super::enum_parsing::parse_enum_specifier(parser, token.pos)?;
                specifiers.push(DeclSpecifier::Type(TypeSpecifier::Enum(spec)));
                has_type_specifier = true;
            }

            TokenKind::Typeof => {
                specifiers.push(DeclSpecifier::Type(parse_typeof(parser)?));
                has_type_specifier = true;
            }

            TokenKind::TypedefName(name) => {
                if has_type_specifier {
                    // A second type name must be the declared identifier
                    // (the typedef-declarator family).
                    break;
                }
                debug!("specifier list: typedef name `{}`", name);
                parser.advance()?;
                let ident = parser.ident(name, token.pos);
                specifiers.push(DeclSpecifier::Type(TypeSpecifier::TypedefName(ident)));
                has_type_specifier = true;
            }

            _ => break,
        }
    }

    if specifiers.is_empty() {
        return Err(parser.syntax_error("declaration specifiers"));
    }
    Ok(specifiers)
}

/// `typeof(expr)` or `typeof(type-name)`. A type-name head cannot start an
/// expression, so one lookahead decides.
fn parse_typeof(parser: &mut Parser) -> Result<TypeSpecifier, ParseError> {
    let token = parser.advance()?;
    parser.expect(TokenKind::LeftParen)?;
    let specifier = if parser.starts_type_name()? {
        let type_name = parse_type_name(parser)?;
        let info = parser.info(token.pos);
        TypeSpecifier::TypeofType(Box::new(type_name), info)
    } else {
        let expr = parser.parse_expr_min()?;
        let info = parser.info(token.pos);
        TypeSpecifier::TypeofExpr(Box::new(expr), info)
    };
    parser.expect(TokenKind::RightParen)?;
    Ok(specifier)
}

/// Type name as used in casts, `sizeof`, `typeof`, compound literals:
/// specifier-qualifier list plus an optional abstract declarator.
pub(crate) fn parse_type_name(parser: &mut Parser) -> Result<TypeName, ParseError> {
    let start = parser.current_pos()?;
    let specifiers = parse_declaration_specifiers(parser)?;
    let declarator = if matches!(
        parser.current_kind()?,
        TokenKind::Star | TokenKind::LeftParen | TokenKind::LeftBracket
    ) {
        Some(Box::new(parse_declarator(parser, DeclaratorContext::Abstract)?))
    } else {
        None
    };
    let info = parser.info(start);
    Ok(TypeName {
        specifiers,
        declarator,
        info,
    })
}

/// One `__attribute__ (( ... ))` specifier. The double parentheses enclose a
/// comma-separated list of items; an empty item contributes nothing.
pub(crate) fn parse_attribute_specifier(
    parser: &mut Parser,
) -> Result<ThinVec<Attribute>, ParseError> {
    parser.expect(TokenKind::Attribute)?;
    parser.expect(TokenKind::LeftParen)?;
    parser.expect(TokenKind::LeftParen)?;

    let mut attributes = ThinVec::new();
    loop {
        let token = parser.current_token()?;
        match token.kind {
            TokenKind::RightParen => break,
            TokenKind::Comma => {
                parser.advance()?;
                continue;
            }
            _ => {}
        }

        let name = parse_attribute_name(parser)?;
        let args = if parser.accept(TokenKind::LeftParen)?.is_some() {
            let args = parse_attribute_args(parser)?;
            parser.expect(TokenKind::RightParen)?;
            args
        } else {
            ThinVec::new()
        };
        let info = parser.info(token.pos);
        attributes.push(Attribute { name, args, info });

        if parser.accept(TokenKind::Comma)?.is_none() {
            break;
        }
    }

    parser.expect(TokenKind::RightParen)?;
    parser.expect(TokenKind::RightParen)?;
    Ok(attributes)
}

fn parse_attribute_name(parser: &mut Parser) -> Result<Ident, ParseError> {
    let token = parser.current_token()?;
    match token.kind {
        TokenKind::Identifier(name) | TokenKind::TypedefName(name) => {
            parser.advance()?;
            Ok(parser.ident(name, token.pos))
        }
        // `__attribute__((const))` uses the keyword as the attribute name.
        TokenKind::Const => {
            parser.advance()?;
            Ok(parser.ident(Symbol::new("const"), token.pos))
        }
        _ => Err(parser.syntax_error("an attribute name")),
    }
}

/// Zero or more adjacent `__attribute__` specifiers.
pub(crate) fn parse_attribute_list(parser: &mut Parser) -> Result<ThinVec<Attribute>, ParseError> {
    let mut attributes = ThinVec::new();
    while parser.is_token(TokenKind::Attribute)? {
        attributes.extend(parse_attribute_specifier(parser)?);
    }
    Ok(attributes)
}

/// `asm("symbol")` after a declarator, if present.
pub(crate) fn parse_asm_name(parser: &mut Parser) -> Result<Option<AsmName>, ParseError> {
    if !parser.is_token(TokenKind::Asm)? {
        return Ok(None);
    }
    let token = parser.advance()?;
    parser.expect(TokenKind::LeftParen)?;
    let (name, _) = parse_string_literal(parser)?;
    parser.expect(TokenKind::RightParen)?;
    let info = parser.info(token.pos);
    Ok(Some(AsmName { name, info }))
}

/// Qualifier lists inside pointer declarators and array brackets. GNU
/// attributes are legal in both spots and ride along as qualifier items.
pub(crate) fn parse_type_qualifier_list(
    parser: &mut Parser,
) -> Result<ThinVec<TypeQualifier>, ParseError> {
    let mut qualifiers = ThinVec::new();
    loop {
        let token = parser.current_token()?;
        match token.kind {
            TokenKind::Const => {
                parser.advance()?;
                let info = parser.info(token.pos);
                qualifiers.push(TypeQualifier::Const(info));
            }
            TokenKind::Volatile => {
                parser.advance()?;
                let info = parser.info(token.pos);
                qualifiers.push(TypeQualifier::Volatile(info));
            }
            TokenKind::Restrict => {
                parser.advance()?;
                let info = parser.info(token.pos);
                qualifiers.push(TypeQualifier::Restrict(info));
            }
            TokenKind::Inline => {
                parser.advance()?;
                let info = parser.info(token.pos);
                qualifiers.push(TypeQualifier::Inline(info));
            }
            TokenKind::Attribute => {
                for attribute in parse_attribute_specifier(parser)? {
                    qualifiers.push(TypeQualifier::Attribute(attribute));
                }
            }
            _ => break,
        }
    }
    Ok(qualifiers)
}

/// One initializer: an assignment expression or a braced list.
pub(crate) fn parse_initializer(parser: &mut Parser) -> Result<Initializer, ParseError> {
    if parser.is_token(TokenKind::LeftBrace)? {
        Ok(Initializer::List(parse_initializer_list(parser)?))
    } else {
        Ok(Initializer::Expr(Box::new(parser.parse_expr_assignment()?)))
    }
}

/// `{ [designation =] initializer , ... }` with optional trailing comma and
/// the GNU range and legacy `member:` designator forms.
pub(crate) fn parse_initializer_list(parser: &mut Parser) -> Result<InitList, ParseError> {
    let lbrace = parser.expect(TokenKind::LeftBrace)?;
    let mut items = Vec::new();

    while !parser.is_token(TokenKind::RightBrace)? {
        let designators = parse_designation(parser)?;
        let init = parse_initializer(parser)?;
        items.push(InitItem { designators, init });

        if parser.accept(TokenKind::Comma)?.is_none() {
            break;
        }
    }

    parser.expect(TokenKind::RightBrace)?;
    let info = parser.info(lbrace.pos);
    Ok(InitList { items, info })
}

fn parse_designation(parser: &mut Parser) -> Result<Vec<Designator>, ParseError> {
    let token = parser.current_token()?;

    // Legacy GNU `member: value` form.
    if matches!(
        token.kind,
        TokenKind::Identifier(_) | TokenKind::TypedefName(_)
    ) && parser.peek_second()?.kind == TokenKind::Colon
    {
        let member = parser.expect_name()?;
        parser.advance()?; // the colon
        return Ok(vec![Designator::Member(member)]);
    }

    if !matches!(token.kind, TokenKind::Dot | TokenKind::LeftBracket) {
        return Ok(Vec::new());
    }

    let mut designators = Vec::new();
    loop {
        let token = parser.current_token()?;
        match token.kind {
            TokenKind::Dot => {
                parser.advance()?;
                designators.push(Designator::Member(parser.expect_name()?));
            }
            TokenKind::LeftBracket => {
                parser.advance()?;
                let lo = parser.parse_expr_conditional()?;
                let designator = if parser.accept(TokenKind::Ellipsis)?.is_some() {
                    let hi = parser.parse_expr_conditional()?;
                    let info = parser.info(token.pos);
                    Designator::Range(lo, hi, info)
                } else {
                    let info = parser.info(token.pos);
                    Designator::Index(lo, info)
                };
                parser.expect(TokenKind::RightBracket)?;
                designators.push(designator);
            }
            _ => break,
        }
    }

    parser.expect(TokenKind::Assign)?;
    Ok(designators)
}
