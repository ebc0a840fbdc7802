//! A parser for preprocessed C99 with the common GNU C extensions.
//!
//! The input is preprocessor output; the result is a purely syntactic,
//! position- and identity-stamped AST ready for semantic analysis or
//! pretty-printing. Supported GNU extensions include `__attribute__`
//! annotations, statement expressions, case ranges, computed goto,
//! `__thread`, inline assembly, label addresses, nested functions,
//! compound literals, designated initializers with range designators,
//! `typeof`, `__alignof__`, `__real__`/`__imag__`, and `__extension__`.
//!
//! The notorious typedef-name ambiguity is resolved the classical way: the
//! parser owns a stack of typedef scopes that grammar actions update while
//! parsing, and every identifier token is classified against it the moment
//! it is fetched.
//!
//! ```no_run
//! use cparse::{parse, Pos};
//!
//! let source = b"typedef int T; T x = 0;";
//! let unit = parse(source, Pos::file_start("input.c"), &["__builtin_va_list"], 1)?;
//! assert_eq!(unit.decls.len(), 2);
//! # Ok::<(), cparse::ParseError>(())
//! ```

pub mod ast;
pub mod diagnostic;
pub mod lexer;
pub mod parser;
pub mod position;
pub mod token;

pub use diagnostic::ParseError;
pub use parser::{parse, Parser};
pub use position::{HasPos, Pos};
