//! Parse errors.
//!
//! The parser does not recover: the first error aborts the parse and is
//! returned to the caller. Every error carries the position of the offending
//! input and renders as `<file>:<line>:<column>: <message>`.

use crate::position::Pos;

/// Errors produced while parsing.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    /// The lexer could not form a token.
    #[error("{pos}: {message}")]
    Lexical { message: String, pos: Pos },

    /// The grammar has no continuation for the lookahead token.
    #[error("{pos}: expected {expected}; syntax error before `{found}`")]
    Syntax {
        expected: String,
        found: String,
        pos: Pos,
    },

    /// Two assembler names were attached to the same declarator.
    #[error("{pos}: conflicting asm register names for `{name}`")]
    AsmNameConflict { name: String, pos: Pos },
}

impl ParseError {
    /// Position of the offending token or input byte.
    pub fn pos(&self) -> Pos {
        match self {
            ParseError::Lexical { pos, .. }
            | ParseError::Syntax { pos, .. }
            | ParseError::AsmNameConflict { pos, .. } => *pos,
        }
    }

    /// The error as a message list. For syntax errors the last entry is the
    /// conventional ``syntax error before `<token>` `` line.
    pub fn messages(&self) -> Vec<String> {
        match self {
            ParseError::Lexical { message, .. } => vec![message.clone()],
            ParseError::Syntax { expected, found, .. } => vec![
                format!("expected {}", expected),
                format!("syntax error before `{}`", found),
            ],
            ParseError::AsmNameConflict { name, .. } => {
                vec![format!("conflicting asm register names for `{}`", name)]
            }
        }
    }
}
