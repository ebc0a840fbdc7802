//! Parser state pipeline and public entry point.
//!
//! The parser drives the lexer one token at a time and owns everything the
//! grammar actions need: the lookahead buffer, the typedef scope stack, and
//! the fresh node-id counter. Lookahead is filled lazily (a token is pulled
//! from the lexer only when a grammar action demands it), which is what makes
//! the typedef machinery work: `typedef` registrations fire after a
//! declaration's `;` is consumed and before the next token is fetched, so
//! the identifier after `typedef int T;` is already classified as a
//! typedef name.

use std::collections::VecDeque;

use log::debug;

use hashbrown::HashMap;

use crate::ast::{Ident, NodeId, NodeInfo, Symbol, TranslationUnit};
use crate::diagnostic::ParseError;
use crate::lexer::Lexer;
use crate::position::Pos;
use crate::token::{Token, TokenKind};

pub mod asm_parsing;
pub mod declaration_core;
pub mod declarations;
pub mod declarator;
pub mod enum_parsing;
pub mod expressions;
pub mod statements;
pub mod struct_parsing;

pub use expressions::BindingPower;

/// Scoped typedef-name environment.
///
/// Each frame maps a name to `true` (bound as a typedef) or `false`
/// (rebound as an ordinary identifier, hiding any outer typedef). Lookup
/// walks innermost-first. The bottom frame holds the caller-seeded builtin
/// typedef names and is never popped.
#[derive(Debug)]
pub struct TypeContext {
    scopes: Vec<HashMap<Symbol, bool>>,
}

impl TypeContext {
    pub fn new<I>(builtins: I) -> Self
    where
        I: IntoIterator<Item = Symbol>,
    {
        let mut global = HashMap::new();
        for name in builtins {
            global.insert(name, true);
        }
        TypeContext {
            scopes: vec![global],
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn leave_scope(&mut self) {
        assert!(self.scopes.len() > 1, "typedef scope underflow");
        self.scopes.pop();
    }

    pub fn add_typedef(&mut self, name: Symbol) {
        debug!("add_typedef({}) at depth {}", name, self.scopes.len());
        self.innermost().insert(name, true);
    }

    /// Rebind `name` as an ordinary identifier in the innermost frame,
    /// hiding any outer typedef until the frame is popped.
    pub fn shadow_typedef(&mut self, name: Symbol) {
        debug!("shadow_typedef({}) at depth {}", name, self.scopes.len());
        self.innermost().insert(name, false);
    }

    pub fn is_type_name(&self, name: Symbol) -> bool {
        for scope in self.scopes.iter().rev() {
            if let Some(&is_typedef) = scope.get(&name) {
                return is_typedef;
            }
        }
        false
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    fn innermost(&mut self) -> &mut HashMap<Symbol, bool> {
        self.scopes
            .last_mut()
            .expect("the global typedef scope is never popped")
    }
}

/// The parser: lexer, lookahead, scopes, and node identity in one place.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    lookahead: VecDeque<Token>,
    type_context: TypeContext,
    next_node_id: u64,
}

impl<'src> Parser<'src> {
    /// Create a parser over preprocessed source bytes.
    ///
    /// `initial_pos` is the position of byte 0 (commonly `(file, 1, 1)`),
    /// `builtin_typedefs` seeds the global typedef scope (callers usually
    /// pass at least `__builtin_va_list`), and `initial_node_id` is the
    /// first node id handed out, so several parses can share an id space.
    pub fn new(
        source: &'src [u8],
        initial_pos: Pos,
        builtin_typedefs: &[&str],
        initial_node_id: u64,
    ) -> Self {
        Parser {
            lexer: Lexer::new(source, initial_pos),
            lookahead: VecDeque::with_capacity(2),
            type_context: TypeContext::new(builtin_typedefs.iter().map(|name| Symbol::new(*name))),
            next_node_id: initial_node_id,
        }
    }

    /// Parse a whole translation unit. Empty input yields an empty
    /// declaration list.
    pub fn parse_translation_unit(&mut self) -> Result<TranslationUnit, ParseError> {
        declarations::parse_translation_unit(self)
    }

    // === Token plumbing ===

    /// Pull one token from the lexer and classify identifiers against the
    /// live typedef environment ("the lexer hack"). This runs at every
    /// fetch because a typedef may have been registered since the previous
    /// token.
    fn fetch(&mut self) -> Result<Token, ParseError> {
        let mut token = self.lexer.next_token()?;
        if let TokenKind::Identifier(name) = token.kind {
            if self.type_context.is_type_name(name) {
                debug!("classified `{}` as typedef name", name);
                token.kind = TokenKind::TypedefName(name);
            }
        }
        Ok(token)
    }

    fn fill(&mut self, n: usize) -> Result<(), ParseError> {
        while self.lookahead.len() < n {
            let token = self.fetch()?;
            self.lookahead.push_back(token);
        }
        Ok(())
    }

    /// The lookahead token, fetched on demand.
    pub(crate) fn current_token(&mut self) -> Result<Token, ParseError> {
        self.fill(1)?;
        Ok(self.lookahead[0])
    }

    /// The token after the lookahead. Only consulted at decision points
    /// that cannot cross a typedef-registration boundary (a label's colon,
    /// a legacy designator colon, `__extension__` dispatch, `sizeof (`).
    pub(crate) fn peek_second(&mut self) -> Result<Token, ParseError> {
        self.fill(2)?;
        Ok(self.lookahead[1])
    }

    pub(crate) fn current_kind(&mut self) -> Result<TokenKind, ParseError> {
        Ok(self.current_token()?.kind)
    }

    pub(crate) fn current_pos(&mut self) -> Result<Pos, ParseError> {
        Ok(self.current_token()?.pos)
    }

    /// Consume and return the lookahead token.
    pub(crate) fn advance(&mut self) -> Result<Token, ParseError> {
        self.fill(1)?;
        Ok(self.lookahead.pop_front().expect("lookahead is filled"))
    }

    /// Consume the lookahead if it matches, otherwise leave it in place.
    pub(crate) fn accept(&mut self, kind: TokenKind) -> Result<Option<Token>, ParseError> {
        if self.current_kind()? == kind {
            Ok(Some(self.advance()?))
        } else {
            Ok(None)
        }
    }

    /// Consume the lookahead if it matches, otherwise fail.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        let token = self.current_token()?;
        if token.kind == kind {
            self.advance()
        } else {
            Err(ParseError::Syntax {
                expected: format!("`{}`", kind),
                found: token.kind.to_string(),
                pos: token.pos,
            })
        }
    }

    pub(crate) fn is_token(&mut self, kind: TokenKind) -> Result<bool, ParseError> {
        Ok(self.current_kind()? == kind)
    }

    pub(crate) fn at_eof(&mut self) -> Result<bool, ParseError> {
        self.is_token(TokenKind::Eof)
    }

    /// Expect an ordinary identifier (labels, goto targets, enumerators).
    pub(crate) fn expect_identifier(&mut self) -> Result<Ident, ParseError> {
        let token = self.current_token()?;
        if let TokenKind::Identifier(name) = token.kind {
            self.advance()?;
            Ok(self.ident(name, token.pos))
        } else {
            Err(self.syntax_error("identifier"))
        }
    }

    /// Expect a name in a position where typedef shadowing does not apply:
    /// member names, struct/union/enum tags, designators. Both ordinary
    /// identifiers and typedef names are legal there.
    pub(crate) fn expect_name(&mut self) -> Result<Ident, ParseError> {
        match self.accept_name()? {
            Some(ident) => Ok(ident),
            None => Err(self.syntax_error("identifier")),
        }
    }

    pub(crate) fn accept_name(&mut self) -> Result<Option<Ident>, ParseError> {
        let token = self.current_token()?;
        match token.kind {
            TokenKind::Identifier(name) | TokenKind::TypedefName(name) => {
                self.advance()?;
                Ok(Some(self.ident(name, token.pos)))
            }
            _ => Ok(None),
        }
    }

    /// Build a syntax error at the lookahead token. A pending lexical error
    /// takes precedence.
    pub(crate) fn syntax_error(&mut self, expected: &str) -> ParseError {
        match self.current_token() {
            Ok(token) => ParseError::Syntax {
                expected: expected.to_string(),
                found: token.kind.to_string(),
                pos: token.pos,
            },
            Err(error) => error,
        }
    }

    // === Node identity ===

    /// Stamp for a node under construction: the given position plus a fresh
    /// id. Ids are strictly increasing and never reused.
    pub(crate) fn info(&mut self, pos: Pos) -> NodeInfo {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        NodeInfo { pos, id }
    }

    pub(crate) fn ident(&mut self, name: Symbol, pos: Pos) -> Ident {
        Ident {
            name,
            info: self.info(pos),
        }
    }

    // === Typedef scopes ===

    pub(crate) fn enter_scope(&mut self) {
        debug!("enter_scope -> depth {}", self.type_context.depth() + 1);
        self.type_context.enter_scope();
    }

    pub(crate) fn leave_scope(&mut self) {
        debug!("leave_scope -> depth {}", self.type_context.depth() - 1);
        self.type_context.leave_scope();
    }

    pub(crate) fn add_typedef(&mut self, name: Symbol) {
        self.type_context.add_typedef(name);
    }

    pub(crate) fn shadow_typedef(&mut self, name: Symbol) {
        self.type_context.shadow_typedef(name);
    }

    pub fn is_type_name(&self, name: Symbol) -> bool {
        self.type_context.is_type_name(name)
    }

    pub(crate) fn scope_depth(&self) -> usize {
        self.type_context.depth()
    }

    // === Grammar predicates ===

    /// Can the lookahead start a declaration? This is where the identifier
    /// classification pays off: `T * p;` starts a declaration exactly when
    /// `T` arrives as a typedef-name token.
    pub(crate) fn starts_declaration(&mut self) -> Result<bool, ParseError> {
        let kind = self.current_kind()?;
        if kind == TokenKind::Extension {
            let second = self.peek_second()?.kind;
            return Ok(second == TokenKind::Extension || starts_declaration_kind(second));
        }
        Ok(starts_declaration_kind(kind))
    }

    /// Can the lookahead start a type name (cast, `sizeof(T)`, `typeof`)?
    pub(crate) fn starts_type_name(&mut self) -> Result<bool, ParseError> {
        Ok(starts_type_name_kind(self.current_kind()?))
    }

    // === Expression shorthands ===

    pub(crate) fn parse_expr_min(&mut self) -> Result<crate::ast::Expr, ParseError> {
        expressions::parse_expression(self, BindingPower::MIN)
    }

    pub(crate) fn parse_expr_assignment(&mut self) -> Result<crate::ast::Expr, ParseError> {
        expressions::parse_expression(self, BindingPower::ASSIGNMENT)
    }

    pub(crate) fn parse_expr_conditional(&mut self) -> Result<crate::ast::Expr, ParseError> {
        expressions::parse_expression(self, BindingPower::CONDITIONAL)
    }
}

pub(crate) fn starts_declaration_kind(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        Typedef
            | Extern
            | Static
            | Auto
            | Register
            | Thread
            | Const
            | Volatile
            | Restrict
            | Inline
            | Void
            | Char
            | Short
            | Int
            | Long
            | Float
            | Double
            | Signed
            | Unsigned
            | Bool
            | Complex
            | Struct
            | Union
            | Enum
            | Typeof
            | Attribute
            | TypedefName(_)
    )
}

pub(crate) fn starts_type_name_kind(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        Const
            | Volatile
            | Restrict
            | Inline
            | Void
            | Char
            | Short
            | Int
            | Long
            | Float
            | Double
            | Signed
            | Unsigned
            | Bool
            | Complex
            | Struct
            | Union
            | Enum
            | Typeof
            | Attribute
            | TypedefName(_)
    )
}

/// Parse a preprocessed translation unit.
///
/// * `source`: the preprocessed C source bytes.
/// * `initial_pos`: position of byte 0, so callers can stitch locations
///   after preprocessing.
/// * `builtin_typedefs`: names seeded into the global typedef scope
///   (e.g. `__builtin_va_list`).
/// * `initial_node_id`: starting value of the node-id counter, letting
///   multiple translation units share one id namespace.
///
/// The first error aborts the parse; no partial AST is returned.
pub fn parse(
    source: &[u8],
    initial_pos: Pos,
    builtin_typedefs: &[&str],
    initial_node_id: u64,
) -> Result<TranslationUnit, ParseError> {
    let mut parser = Parser::new(source, initial_pos, builtin_typedefs, initial_node_id);
    parser.parse_translation_unit()
}

#[cfg(test)]
mod tests_parser;
