use crate::diagnostic::ParseError;
use crate::parser::parse;
use crate::position::Pos;
use crate::tests::common::*;

#[test]
fn test_syntax_error_message_shape() {
    let error = parse_fail("int x");
    let messages = error.messages();
    assert!(!messages.is_empty());
    assert!(
        messages.last().unwrap().contains("syntax error before"),
        "got {messages:?}"
    );
}

#[test]
fn test_error_position_points_at_offending_token() {
    let error = parse_fail("int x @;");
    let pos = error.pos();
    assert_eq!(pos.line, 1);
    assert_eq!(pos.column, 7);
}

#[test]
fn test_error_display_is_file_line_column() {
    let error = parse(b"int 5;", Pos::file_start("bad.c"), BUILTINS, 1).unwrap_err();
    let rendered = error.to_string();
    assert!(rendered.starts_with("bad.c:1:5:"), "got {rendered}");
    assert!(rendered.contains("syntax error before `5`"));
}

#[test]
fn test_missing_semicolon() {
    let error = parse_fail("int x int y;");
    assert!(matches!(error, ParseError::Syntax { .. }));
    assert!(error.to_string().contains("syntax error before `int`"));
}

#[test]
fn test_unbalanced_braces() {
    let error = parse_fail("void f(void) { if (x) { y(); }");
    assert!(matches!(error, ParseError::Syntax { .. }));
}

#[test]
fn test_declaration_without_specifiers_fails() {
    // Implicit int is not supported: a bare declarator is a syntax error.
    let error = parse_fail("x;");
    assert!(matches!(error, ParseError::Syntax { .. }));
}

#[test]
fn test_lexical_error_aborts_parse() {
    let error = parse_fail("char *s = \"unterminated;\nint x;");
    assert!(matches!(error, ParseError::Lexical { .. }));
    assert_eq!(error.messages().len(), 1);
}

#[test]
fn test_expression_error_reports_token() {
    let error = parse_fail("void f(void) { x = ; }");
    assert!(error.to_string().contains("syntax error before `;`"));
}

#[test]
fn test_no_partial_result_on_error() {
    // The first error aborts; nothing of the earlier declarations leaks out.
    let result = parse(
        b"int ok; int also_ok; int @;",
        Pos::file_start("t.c"),
        BUILTINS,
        1,
    );
    assert!(result.is_err());
}

#[test]
fn test_typedef_name_in_expression_position_fails() {
    let error = parse_fail("typedef int T; void f(void) { return T + 1; }");
    assert!(matches!(error, ParseError::Syntax { .. }));
}
