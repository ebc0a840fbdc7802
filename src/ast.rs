//! Abstract syntax tree for C99 + GNU C.
//!
//! The tree is purely syntactic: specifier lists are kept in source order and
//! uninterpreted, declarators mirror the wrapping structure of the source,
//! and nothing is type-checked. Every node carries a [`NodeInfo`] stamp
//! (source position plus a parse-unique id) assigned at construction; nodes
//! are never mutated afterwards.

use std::fmt;

use crate::position::{HasPos, Pos};

/// Interned string. Alias for `GlobalSymbol` from the `symbol_table` crate
/// with the global feature.
pub type Symbol = symbol_table::GlobalSymbol;

pub mod nodes;

pub use nodes::*;

/// Identity of an AST node, unique within one parse and strictly increasing
/// in construction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The stamp carried by every AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeInfo {
    pub pos: Pos,
    pub id: NodeId,
}

impl HasPos for NodeInfo {
    fn pos(&self) -> Pos {
        self.pos
    }
}

/// An identifier occurrence. Equality is by name; the stamp records where
/// this occurrence appeared.
#[derive(Debug, Clone, Copy)]
pub struct Ident {
    pub name: Symbol,
    pub info: NodeInfo,
}

impl PartialEq for Ident {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Ident {}

impl HasPos for Ident {
    fn pos(&self) -> Pos {
        self.info.pos
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
