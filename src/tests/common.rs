use crate::ast::*;
use crate::diagnostic::ParseError;
use crate::parser::parse;
use crate::position::Pos;

pub(crate) const BUILTINS: &[&str] = &["__builtin_va_list"];

pub(crate) fn parse_str(source: &str) -> TranslationUnit {
    parse(source.as_bytes(), Pos::file_start("<test>"), BUILTINS, 1)
        .unwrap_or_else(|error| panic!("parse failed on {source:?}: {error}"))
}

pub(crate) fn parse_fail(source: &str) -> ParseError {
    match parse(source.as_bytes(), Pos::file_start("<test>"), BUILTINS, 1) {
        Ok(_) => panic!("expected a parse error for {source:?}"),
        Err(error) => error,
    }
}

/// Parse a source expected to contain exactly one declaration.
pub(crate) fn decl(source: &str) -> Declaration {
    let unit = parse_str(source);
    assert_eq!(unit.decls.len(), 1, "expected one declaration in {source:?}");
    match unit.decls.into_iter().next() {
        Some(ExternalDecl::Declaration(decl)) => decl,
        other => panic!("expected a declaration, got {other:?}"),
    }
}

/// Parse a source expected to contain exactly one function definition.
pub(crate) fn func(source: &str) -> FunctionDef {
    let unit = parse_str(source);
    assert_eq!(unit.decls.len(), 1, "expected one definition in {source:?}");
    match unit.decls.into_iter().next() {
        Some(ExternalDecl::FunctionDef(def)) => *def,
        other => panic!("expected a function definition, got {other:?}"),
    }
}

/// Parse a single expression by wrapping it in a statement.
pub(crate) fn expr(source: &str) -> Expr {
    let def = func(&format!("void f(void) {{ {source}; }}"));
    match def.body.items.into_iter().next() {
        Some(BlockItem::Statement(Stmt::Expr {
            expr: Some(expr), ..
        })) => *expr,
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

/// Parse a single statement inside a function body.
pub(crate) fn stmt(source: &str) -> Stmt {
    let def = func(&format!("void f(void) {{ {source} }}"));
    match def.body.items.into_iter().next() {
        Some(BlockItem::Statement(stmt)) => stmt,
        other => panic!("expected a statement, got {other:?}"),
    }
}

/// The single named declarator of a declaration.
pub(crate) fn only_declarator(decl: &Declaration) -> &Declarator {
    assert_eq!(decl.declarators.len(), 1);
    decl.declarators[0]
        .declarator
        .as_ref()
        .expect("declaration has a declarator")
}

pub(crate) fn declared_name(decl: &Declaration, index: usize) -> String {
    decl.declarators[index]
        .declarator
        .as_ref()
        .and_then(|declarator| declarator.name())
        .map(|ident| ident.name.to_string())
        .expect("declarator has a name")
}

pub(crate) fn int_constant(expr: &Expr) -> u64 {
    match expr {
        Expr::Constant(Constant::Int(value, _), _) => *value,
        other => panic!("expected an integer constant, got {other:?}"),
    }
}

/// The record specifier of a declaration whose type is a struct or union.
pub(crate) fn record_specifier(decl: &Declaration) -> &RecordSpecifier {
    decl.specifiers
        .iter()
        .find_map(|spec| match spec {
            DeclSpecifier::Type(TypeSpecifier::Record(record)) => Some(record),
            _ => None,
        })
        .expect("declaration has a record specifier")
}
