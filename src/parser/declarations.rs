//! Translation units, external declarations, and function definitions.
//!
//! The top level distinguishes function definitions from declarations after
//! the first declarator: a `{` (possibly behind an asm name and trailing
//! attributes) means a definition, and a declaration-start token after an
//! old-style identifier list means a K&R definition with its parameter
//! declaration list.
//!
//! Typedef registration happens here. After a declaration's `;` is
//! consumed, each named declarator either binds a typedef name or shadows
//! one, and because lookahead is filled lazily this runs before the next
//! token is classified. That ordering is the whole reason the grammar and
//! the parser state are interleaved.

use log::debug;
use thin_vec::ThinVec;

use crate::ast::*;
use crate::diagnostic::ParseError;
use crate::token::TokenKind;

use super::declaration_core::{
    parse_asm_name, parse_attribute_list, parse_declaration_specifiers, parse_initializer,
};
use super::declarator::{parse_declarator, DeclaratorContext};
use super::statements::parse_compound_statement;
use super::Parser;

pub(crate) fn parse_translation_unit(parser: &mut Parser) -> Result<TranslationUnit, ParseError> {
    let start = parser.current_pos()?;
    let mut decls = Vec::new();

    loop {
        if parser.at_eof()? {
            break;
        }
        // Stray top-level semicolons are a GNU extension.
        if parser.accept(TokenKind::Semicolon)?.is_some() {
            continue;
        }
        decls.push(parse_external_declaration(parser)?);
    }

    let info = parser.info(start);
    Ok(TranslationUnit { decls, info })
}

pub(crate) fn parse_external_declaration(parser: &mut Parser) -> Result<ExternalDecl, ParseError> {
    // `__extension__` markers are syntactically transparent.
    while parser.accept(TokenKind::Extension)?.is_some() {}

    if parser.is_token(TokenKind::Asm)? {
        let asm = super::asm_parsing::parse_asm_statement(parser)?;
        return Ok(ExternalDecl::Asm(asm));
    }

    match parse_declaration_or_function(parser, true)? {
        DeclOrFunction::Declaration(decl) => Ok(ExternalDecl::Declaration(decl)),
        DeclOrFunction::Function(def) => Ok(ExternalDecl::FunctionDef(Box::new(def))),
    }
}

pub(crate) enum DeclOrFunction {
    Declaration(Declaration),
    Function(FunctionDef),
}

/// A declaration in a context where function definitions are not allowed
/// (for-init clauses, K&R parameter declaration lists).
pub(crate) fn parse_declaration(parser: &mut Parser) -> Result<Declaration, ParseError> {
    match parse_declaration_or_function(parser, false)? {
        DeclOrFunction::Declaration(decl) => Ok(decl),
        DeclOrFunction::Function(_) => unreachable!("function definitions disabled"),
    }
}

pub(crate) fn parse_declaration_or_function(
    parser: &mut Parser,
    allow_function: bool,
) -> Result<DeclOrFunction, ParseError> {
    while parser.accept(TokenKind::Extension)?.is_some() {}

    let start = parser.current_pos()?;
    let specifiers = parse_declaration_specifiers(parser)?;

    // A bare specifier list: struct/union/enum definition or forward
    // reference, `typedef` without declarators, and friends.
    if parser.accept(TokenKind::Semicolon)?.is_some() {
        let info = parser.info(start);
        return Ok(DeclOrFunction::Declaration(Declaration {
            specifiers,
            declarators: ThinVec::new(),
            info,
        }));
    }

    let declarator = parse_declarator(parser, DeclaratorContext::Named)?;
    let declarator = parse_declarator_annotations(parser, declarator)?;

    if allow_function && declarator.is_function() {
        let old_style = matches!(
            declarator.param_list(),
            Some(ParamList::Identifiers(names)) if !names.is_empty()
        );
        if parser.is_token(TokenKind::LeftBrace)?
            || (old_style && parser.starts_declaration()?)
        {
            let def = parse_function_definition(parser, start, specifiers, declarator)?;
            return Ok(DeclOrFunction::Function(def));
        }
    }

    let mut declarators: ThinVec<InitDeclarator> = ThinVec::new();
    let mut current = declarator;
    loop {
        let initializer = if parser.accept(TokenKind::Assign)?.is_some() {
            Some(parse_initializer(parser)?)
        } else {
            None
        };
        declarators.push(InitDeclarator {
            declarator: Some(current),
            initializer,
            bit_width: None,
        });

        if parser.accept(TokenKind::Comma)?.is_none() {
            break;
        }
        let next = parse_declarator(parser, DeclaratorContext::Named)?;
        current = parse_declarator_annotations(parser, next)?;
    }

    parser.expect(TokenKind::Semicolon)?;

    let info = parser.info(start);
    let declaration = Declaration {
        specifiers,
        declarators,
        info,
    };

    // The declared names must be (un)registered before the next token is
    // fetched, so the identifier after this declaration is classified
    // against the updated environment.
    register_declaration(parser, &declaration);

    Ok(DeclOrFunction::Declaration(declaration))
}

/// Trailing declarator annotations: `asm("name")` and `__attribute__`
/// specifiers, in any order. Each is pushed down to the innermost variable
/// declarator as it is parsed, so a second asm name meets the first and
/// reports the conflict.
fn parse_declarator_annotations(
    parser: &mut Parser,
    mut declarator: Declarator,
) -> Result<Declarator, ParseError> {
    loop {
        if parser.is_token(TokenKind::Asm)? {
            let asm_name = parse_asm_name(parser)?;
            declarator = declarator.annotate(asm_name, ThinVec::new())?;
        } else if parser.is_token(TokenKind::Attribute)? {
            let attributes = parse_attribute_list(parser)?;
            declarator = declarator.annotate(None, attributes)?;
        } else {
            return Ok(declarator);
        }
    }
}

fn register_declaration(parser: &mut Parser, declaration: &Declaration) {
    let is_typedef = declaration.is_typedef();
    for slot in &declaration.declarators {
        let Some(declarator) = &slot.declarator else {
            continue;
        };
        let Some(name) = declarator.name() else {
            continue;
        };
        if is_typedef {
            parser.add_typedef(name.name);
        } else {
            parser.shadow_typedef(name.name);
        }
    }
}

fn parse_function_definition(
    parser: &mut Parser,
    start: crate::position::Pos,
    specifiers: ThinVec<DeclSpecifier>,
    declarator: Declarator,
) -> Result<FunctionDef, ParseError> {
    debug!(
        "function definition `{}`",
        declarator
            .name()
            .map(|ident| ident.name.as_str())
            .unwrap_or("<anonymous>")
    );

    // The function scope opens before the body so parameter names shadow
    // outer typedef names throughout it.
    parser.enter_scope();
    match declarator.param_list() {
        Some(ParamList::Prototype { params, .. }) => {
            for param in params {
                if let Some(param_declarator) = &param.declarator {
                    if let Some(name) = param_declarator.name() {
                        parser.shadow_typedef(name.name);
                    }
                }
            }
        }
        Some(ParamList::Identifiers(names)) => {
            for name in names {
                parser.shadow_typedef(name.name);
            }
        }
        None => {}
    }

    // K&R parameter declarations, interpreting the identifier list.
    let mut kr_declarations = Vec::new();
    while !parser.is_token(TokenKind::LeftBrace)? && parser.starts_declaration()? {
        kr_declarations.push(parse_declaration(parser)?);
    }

    let body = parse_compound_statement(parser);
    parser.leave_scope();
    let body = body?;

    let info = parser.info(start);
    Ok(FunctionDef {
        specifiers,
        declarator,
        kr_declarations,
        body,
        info,
    })
}
